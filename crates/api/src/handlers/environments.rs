//! 테스트 환경 핸들러

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use testrack_core::page::Page;
use testrack_core::types::{TestEnvironment, TestEnvironmentSpec};

use super::parse_id;
use crate::error::ApiError;
use crate::pagination::Paging;
use crate::payload::Payload;
use crate::state::AppState;

/// `GET /testenvironments/`
pub async fn list(
    State(state): State<AppState>,
    paging: Paging,
) -> Result<Json<Page<TestEnvironment>>, ApiError> {
    let environments = state.environments.list_environments().await;
    Ok(Json(paging.paginate(environments)?))
}

/// `POST /testenvironments/`: 중첩 `distro`를 담은 JSON 문서만 허용
pub async fn create(
    State(state): State<AppState>,
    payload: Payload<TestEnvironmentSpec>,
) -> Result<(StatusCode, Json<TestEnvironment>), ApiError> {
    let environment = state
        .environments
        .create_environment(payload.into_inner())
        .await?;
    Ok((StatusCode::CREATED, Json(environment)))
}

/// `GET /testenvironments/{id}/`
pub async fn get(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<TestEnvironment>, ApiError> {
    let id = parse_id("testenvironments", &raw)?;
    Ok(Json(state.environments.get_environment(id).await?))
}
