//! 레퍼런스 카탈로그 핸들러 (읽기 전용)

use axum::Json;
use axum::extract::{Path, State};

use testrack_core::page::Page;
use testrack_core::types::CatalogEntry;
use testrack_registry::CatalogKind;

use crate::error::ApiError;
use crate::pagination::Paging;
use crate::payload::Payload;
use crate::state::AppState;

/// `GET /<catalog>/`
pub async fn list(
    kind: CatalogKind,
    State(state): State<AppState>,
    paging: Paging,
) -> Result<Json<Page<CatalogEntry>>, ApiError> {
    let entries = state.catalogs.get(kind).list().to_vec();
    Ok(Json(paging.paginate(entries)?))
}

/// `GET /<catalog>/{name}/`
pub async fn get(
    kind: CatalogKind,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CatalogEntry>, ApiError> {
    let entry = state.catalogs.get(kind).get_by_name(&name)?;
    Ok(Json(entry.clone()))
}

/// `POST /<catalog>/`: 본문 해석 여부와 무관하게 403
pub async fn create(
    kind: CatalogKind,
    State(state): State<AppState>,
    payload: Result<Payload<CatalogEntry>, ApiError>,
) -> Result<Json<CatalogEntry>, ApiError> {
    let entry = payload.ok().map(Payload::into_inner);
    let created = state.catalogs.get(kind).create(entry.as_ref())?;
    Ok(Json(created))
}

/// `DELETE /<catalog>/{name}/`: 항상 403
pub async fn delete(
    kind: CatalogKind,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(), ApiError> {
    state.catalogs.get(kind).delete(&name)?;
    Ok(())
}
