//! 리소스별 요청 핸들러
//!
//! 핸들러는 요청을 디코딩하고 레지스트리 핸들을 호출할 뿐, 검증 규칙은 갖지 않습니다.

pub mod catalogs;
pub mod descriptors;
pub mod environments;
pub mod jobs;

use axum::Json;

use testrack_core::error::ResourceError;
use testrack_core::types::VersionInfo;

use crate::error::ApiError;

/// `GET /version/`
pub async fn version() -> Json<VersionInfo> {
    Json(VersionInfo::current())
}

/// 라우트에 없는 경로
pub async fn fallback(uri: axum::http::Uri) -> ApiError {
    ResourceError::not_found("route", uri.path()).into()
}

/// 경로의 숫자 id를 해석합니다. 숫자가 아니면 존재하지 않는 리소스로 취급합니다.
pub(crate) fn parse_id(resource: &str, raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ResourceError::not_found(resource, raw).into())
}
