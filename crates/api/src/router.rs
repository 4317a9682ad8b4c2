//! Axum 라우터 구성
//!
//! ## 경로 구조
//!
//! ```text
//! /
//! ├── /version/                         - 서버 이름과 버전
//! ├── /<catalog>/[{name}/]              - 읽기 전용 레퍼런스 카탈로그 5종
//! ├── /softwarecomponents/[{id}/]       - 소프트웨어 컴포넌트
//! ├── /linuxdistros/[{id}/]             - 리눅스 배포판
//! ├── /testenvironments/[{id}/]         - 테스트 환경 (배포판 중첩 upsert)
//! └── /jobs/[{id}/[activities|tests/[{sub_id}/]]]
//! ```
//!
//! 모든 경로는 Basic 인증 뒤에 있고, 가장 바깥 계층에서 요청 수와 지연 시간을 기록합니다.
//! 커서가 요청 경로를 그대로 쓰므로 라우터는 `nest` 없이 평면으로 구성합니다.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{Path, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get};

use testrack_core::metrics as m;
use testrack_core::types::CatalogEntry;
use testrack_registry::CatalogKind;

use crate::auth::{Credentials, require_basic_auth};
use crate::error::ApiError;
use crate::handlers::{self, catalogs, descriptors, environments, jobs};
use crate::pagination::Paging;
use crate::payload::Payload;
use crate::state::AppState;

/// 전체 라우터를 만듭니다.
pub fn build_router(state: AppState, credentials: Arc<Credentials>) -> Router {
    let mut router = Router::new().route("/version/", get(handlers::version));

    for kind in CatalogKind::ALL {
        router = router.merge(catalog_routes(kind));
    }

    router
        .route(
            "/softwarecomponents/",
            get(descriptors::list_components).post(descriptors::create_component),
        )
        .route("/softwarecomponents/{id}/", get(descriptors::get_component))
        .route(
            "/linuxdistros/",
            get(descriptors::list_distros).post(descriptors::create_distro),
        )
        .route("/linuxdistros/{id}/", get(descriptors::get_distro))
        .route(
            "/testenvironments/",
            get(environments::list).post(environments::create),
        )
        .route("/testenvironments/{id}/", get(environments::get))
        .route("/jobs/", get(jobs::list).post(jobs::create))
        .route("/jobs/{id}/", get(jobs::get).delete(jobs::delete))
        .route(
            "/jobs/{id}/activities/",
            get(jobs::list_activities).post(jobs::add_activity),
        )
        .route(
            "/jobs/{id}/activities/{activity_id}/",
            delete(jobs::remove_activity),
        )
        .route(
            "/jobs/{id}/tests/",
            get(jobs::list_tests).post(jobs::add_test),
        )
        .route(
            "/jobs/{id}/tests/{test_id}/",
            delete(jobs::remove_test),
        )
        .fallback(handlers::fallback)
        .layer(middleware::from_fn_with_state(credentials, require_basic_auth))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

/// 카탈로그 하나의 목록/단건 경로
///
/// `POST`와 `DELETE`는 항상 403 정책 거부입니다.
fn catalog_routes(kind: CatalogKind) -> Router<AppState> {
    let base = format!("/{}/", kind.resource());
    let item = format!("/{}/{{name}}/", kind.resource());

    Router::new()
        .route(
            &base,
            get(move |state: State<AppState>, paging: Paging| {
                catalogs::list(kind, state, paging)
            })
            .post(
                move |state: State<AppState>, payload: Result<Payload<CatalogEntry>, ApiError>| {
                    catalogs::create(kind, state, payload)
                },
            ),
        )
        .route(
            &item,
            get(move |state: State<AppState>, name: Path<String>| {
                catalogs::get(kind, state, name)
            })
            .delete(move |state: State<AppState>, name: Path<String>| {
                catalogs::delete(kind, state, name)
            }),
        )
}

/// 요청 추적 미들웨어 (메트릭 + debug 로그)
async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();
    metrics::counter!(
        m::HTTP_REQUESTS_TOTAL,
        m::LABEL_METHOD => method.to_string(),
        m::LABEL_STATUS => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!(m::HTTP_REQUEST_DURATION_SECONDS).record(elapsed.as_secs_f64());
    tracing::debug!(
        %method,
        path = %path,
        status = status.as_u16(),
        latency_us = elapsed.as_micros() as u64,
        "request handled"
    );

    response
}
