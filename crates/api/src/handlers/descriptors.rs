//! 소프트웨어 컴포넌트 / 리눅스 배포판 핸들러

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use testrack_core::page::Page;
use testrack_core::types::{DistroSpec, LinuxDistro, SoftwareComponent, SoftwareComponentSpec};

use super::parse_id;
use crate::error::ApiError;
use crate::pagination::Paging;
use crate::payload::Payload;
use crate::state::AppState;

/// `GET /softwarecomponents/`
pub async fn list_components(
    State(state): State<AppState>,
    paging: Paging,
) -> Result<Json<Page<SoftwareComponent>>, ApiError> {
    let components = state.descriptors.list_components().await;
    Ok(Json(paging.paginate(components)?))
}

/// `POST /softwarecomponents/`
pub async fn create_component(
    State(state): State<AppState>,
    payload: Payload<SoftwareComponentSpec>,
) -> Result<(StatusCode, Json<SoftwareComponent>), ApiError> {
    let component = state
        .descriptors
        .create_component(payload.into_inner())
        .await?;
    Ok((StatusCode::CREATED, Json(component)))
}

/// `GET /softwarecomponents/{id}/`
pub async fn get_component(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<SoftwareComponent>, ApiError> {
    let id = parse_id("softwarecomponents", &raw)?;
    Ok(Json(state.descriptors.get_component(id).await?))
}

/// `GET /linuxdistros/`
pub async fn list_distros(
    State(state): State<AppState>,
    paging: Paging,
) -> Result<Json<Page<LinuxDistro>>, ApiError> {
    let distros = state.descriptors.list_distros().await;
    Ok(Json(paging.paginate(distros)?))
}

/// `POST /linuxdistros/`
pub async fn create_distro(
    State(state): State<AppState>,
    payload: Payload<DistroSpec>,
) -> Result<(StatusCode, Json<LinuxDistro>), ApiError> {
    let distro = state.descriptors.create_distro(payload.into_inner()).await?;
    Ok((StatusCode::CREATED, Json(distro)))
}

/// `GET /linuxdistros/{id}/`
pub async fn get_distro(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<LinuxDistro>, ApiError> {
    let id = parse_id("linuxdistros", &raw)?;
    Ok(Json(state.descriptors.get_distro(id).await?))
}
