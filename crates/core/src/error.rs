//! 에러 타입: 도메인별 에러 정의
//!
//! [`ResourceError`]는 리소스 서버의 검증 결과 분류입니다.
//! 모든 변형은 로컬 검증 결과이며 일시적 장애가 아니므로 서버가 재시도하지 않습니다.

use std::fmt;

/// testrack 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum TestrackError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 리소스 검증/조회 에러
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 리소스 검증 결과 분류
///
/// API 계층은 이 분류만 보고 상태 코드를 결정합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// 불변 레퍼런스 카탈로그에 대한 변경 시도
    #[error("{catalog} is a read-only catalog")]
    PolicyRejection { catalog: String },

    /// 유일성 위반 (중복 디스크립터 튜플, 중복 잡 id)
    #[error("{resource} already exists: {key}")]
    Conflict { resource: String, key: String },

    /// 카탈로그/레지스트리에 없는 값을 참조
    #[error("invalid reference in '{field}': '{value}' does not exist")]
    InvalidReference { field: String, value: String },

    /// 존재하지 않는 리소스 대상
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// 필수 필드 누락, 타입 불일치, 잘못된 인코딩
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ResourceError {
    /// 외부로 노출되는 에러 종류 태그
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PolicyRejection { .. } => ErrorKind::PolicyRejection,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidReference { .. } => ErrorKind::InvalidReference,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MalformedPayload(_) => ErrorKind::MalformedPayload,
        }
    }

    pub fn policy_rejection(catalog: impl Into<String>) -> Self {
        Self::PolicyRejection {
            catalog: catalog.into(),
        }
    }

    pub fn conflict(resource: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Conflict {
            resource: resource.into(),
            key: key.into(),
        }
    }

    pub fn invalid_reference(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidReference {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload(reason.into())
    }
}

/// [`ResourceError`] 종류 태그 (메트릭 레이블, 응답 본문에 사용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PolicyRejection,
    Conflict,
    InvalidReference,
    NotFound,
    MalformedPayload,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PolicyRejection => "policy_rejection",
            Self::Conflict => "conflict",
            Self::InvalidReference => "invalid_reference",
            Self::NotFound => "not_found",
            Self::MalformedPayload => "malformed_payload",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
