//! API 에러: 검증 결과 분류를 HTTP 응답으로 변환

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use testrack_core::error::ResourceError;

/// `WWW-Authenticate` 챌린지
pub const BASIC_CHALLENGE: &str = "Basic realm=\"testrack\"";

/// 핸들러와 미들웨어가 돌려주는 에러
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 리소스 계층의 검증/조회 실패
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// 자격 증명 누락 또는 불일치
    #[error("authentication credentials were not provided or are invalid")]
    Unauthorized,
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    kind: &'static str,
}

impl ApiError {
    /// 상태 코드 매핑
    ///
    /// - PolicyRejection: 403
    /// - Conflict, InvalidReference, MalformedPayload: 400
    /// - NotFound: 404
    /// - Unauthorized: 401
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Resource(err) => match err {
                ResourceError::PolicyRejection { .. } => StatusCode::FORBIDDEN,
                ResourceError::Conflict { .. }
                | ResourceError::InvalidReference { .. }
                | ResourceError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
                ResourceError::NotFound { .. } => StatusCode::NOT_FOUND,
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// 응답 본문의 `kind` 태그
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Resource(err) => err.kind().as_str(),
            Self::Unauthorized => "unauthorized",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: self.to_string(),
            kind: self.kind(),
        };

        let mut response = (status, Json(body)).into_response();
        if matches!(self, Self::Unauthorized) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (ResourceError::policy_rejection("jobstatuses"), StatusCode::FORBIDDEN),
            (ResourceError::conflict("linuxdistros", "x"), StatusCode::BAD_REQUEST),
            (
                ResourceError::invalid_reference("status", "DONE"),
                StatusCode::BAD_REQUEST,
            ),
            (ResourceError::not_found("jobs", "x"), StatusCode::NOT_FOUND),
            (ResourceError::malformed("bad"), StatusCode::BAD_REQUEST),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unauthorized_response_carries_challenge() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            BASIC_CHALLENGE
        );
    }

    #[test]
    fn resource_error_detail_is_passed_through() {
        let err = ApiError::from(ResourceError::invalid_reference("priority", "SUPER"));
        assert!(err.to_string().contains("SUPER"));
        assert_eq!(err.kind(), "invalid_reference");
    }
}
