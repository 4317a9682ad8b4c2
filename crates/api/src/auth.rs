//! HTTP Basic 인증
//!
//! 모든 경로는 설정된 단일 자격 증명으로 보호됩니다.
//! 사용자 이름과 비밀번호는 상수 시간으로 비교합니다.

use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;

use testrack_core::config::AuthConfig;
use testrack_core::metrics as m;

use crate::error::ApiError;

/// 서버가 받아들이는 자격 증명
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.username, &config.password)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Authorization` 헤더 값을 검증합니다.
    ///
    /// 형식이 잘못된 헤더(스킴 불일치, base64 오류, `:` 없음)는 불일치로 취급합니다.
    pub fn verify(&self, authorization: &str) -> bool {
        let Some((scheme, encoded)) = authorization.trim().split_once(' ') else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("basic") {
            return false;
        }
        let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
            return false;
        };
        let Ok(decoded) = String::from_utf8(decoded) else {
            return false;
        };
        let Some((username, password)) = decoded.split_once(':') else {
            return false;
        };

        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(user_ok & pass_ok)
    }

    /// 클라이언트가 보낼 `Authorization` 헤더 값
    pub fn header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 인증 미들웨어
///
/// `axum::middleware::from_fn_with_state`로 라우터 전체에 적용합니다.
pub async fn require_basic_auth(
    State(credentials): State<Arc<Credentials>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let verdict = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| credentials.verify(v));

    match verdict {
        Some(true) => Ok(next.run(request).await),
        Some(false) => {
            tracing::warn!(
                method = %request.method(),
                path = request.uri().path(),
                "invalid credentials"
            );
            metrics::counter!(m::HTTP_AUTH_FAILURES_TOTAL).increment(1);
            Err(ApiError::Unauthorized)
        }
        None => {
            tracing::debug!(
                method = %request.method(),
                path = request.uri().path(),
                "no authorization header"
            );
            metrics::counter!(m::HTTP_AUTH_FAILURES_TOTAL).increment(1);
            Err(ApiError::Unauthorized)
        }
    }
}
