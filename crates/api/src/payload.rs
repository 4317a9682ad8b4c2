//! 요청 페이로드 디코더
//!
//! 생성 요청 본문은 두 가지 인코딩 중 하나입니다.
//!
//! - `application/json` → 구조화 문서 ([`PayloadEncoding::Document`])
//! - `application/x-www-form-urlencoded` 또는 Content-Type 없음 → 평면 form ([`PayloadEncoding::Form`])
//!
//! 그 밖의 Content-Type은 `MalformedPayload`입니다. 중첩 객체를 담는 요청 타입
//! ([`PayloadShape::NESTED`])은 form 인코딩을 받지 않으며, 평면 키에서 중첩 구조를
//! 추측하지 않습니다.

use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use testrack_core::error::ResourceError;
use testrack_core::types::{
    ActivitySpec, CatalogEntry, DistroSpec, JobSpec, SoftwareComponentSpec, TestEnvironmentSpec,
    TestSpec,
};

use crate::error::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 페이로드 인코딩 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// 평면 key=value form
    Form,
    /// 구조화 JSON 문서
    Document,
}

impl PayloadEncoding {
    /// Content-Type 헤더로 인코딩을 결정합니다.
    pub fn detect(headers: &HeaderMap) -> Result<Self, ResourceError> {
        let Some(value) = headers.get(header::CONTENT_TYPE) else {
            return Ok(Self::Form);
        };
        let raw = value
            .to_str()
            .map_err(|_| ResourceError::malformed("content type is not valid ASCII"))?;
        let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

        if essence == "application/json"
            || (essence.starts_with("application/") && essence.ends_with("+json"))
        {
            Ok(Self::Document)
        } else if essence == FORM_CONTENT_TYPE {
            Ok(Self::Form)
        } else {
            Err(ResourceError::malformed(format!(
                "unsupported content type '{raw}'"
            )))
        }
    }
}

/// 요청 타입이 어떤 인코딩을 받을 수 있는지
pub trait PayloadShape {
    /// 중첩 객체를 포함하면 `true` (구조화 문서만 허용)
    const NESTED: bool = false;
}

impl PayloadShape for CatalogEntry {}
impl PayloadShape for SoftwareComponentSpec {}
impl PayloadShape for DistroSpec {}
impl PayloadShape for JobSpec {}
impl PayloadShape for ActivitySpec {}
impl PayloadShape for TestSpec {}

impl PayloadShape for TestEnvironmentSpec {
    const NESTED: bool = true;
}

/// 디코딩된 생성 요청
#[derive(Debug, Clone)]
pub struct Payload<T> {
    pub encoding: PayloadEncoding,
    pub value: T,
}

impl<T> Payload<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + PayloadShape + Send,
{
    type Rejection = ApiError;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let encoding = PayloadEncoding::detect(req.headers())?;

        let value = match encoding {
            PayloadEncoding::Document => {
                let Json(value) = Json::<T>::from_request(req, state)
                    .await
                    .map_err(|rejection| ResourceError::malformed(rejection.body_text()))?;
                value
            }
            PayloadEncoding::Form => {
                if T::NESTED {
                    return Err(ResourceError::malformed(
                        "this resource contains nested objects and requires an application/json document",
                    )
                    .into());
                }
                // 대소문자가 다르거나 헤더가 없어도 form으로 판정됐으므로 정규 형태로 교체
                req.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(FORM_CONTENT_TYPE),
                );
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(|rejection| ResourceError::malformed(rejection.body_text()))?;
                value
            }
        };

        Ok(Self { encoding, value })
    }
}
