//! 설정 관리: testrack.toml 파싱 및 런타임 설정
//!
//! [`TestrackConfig`]는 서버 전체 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`TESTRACK_SERVER_PORT=9405` 형식)
//! 3. 설정 파일 (`testrack.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), testrack_core::error::TestrackError> {
//! use testrack_core::config::TestrackConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = TestrackConfig::load("testrack.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = TestrackConfig::parse("[server]\nport = 8000")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, TestrackError};

/// 기본 인증 사용자 (개발용)
pub const DEFAULT_USERNAME: &str = "admin";
/// 기본 인증 비밀번호 (개발용)
pub const DEFAULT_PASSWORD: &str = "123";

/// testrack 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestrackConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// HTTP 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl TestrackConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TestrackError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    ///
    /// 검증하지 않습니다. 오버라이드가 파일 값을 고칠 수 있으므로
    /// 병합이 끝난 뒤 [`validate`](Self::validate)를 호출해야 합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, TestrackError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TestrackError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                TestrackError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, TestrackError> {
        toml::from_str(toml_str).map_err(|e| {
            TestrackError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `TESTRACK_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "TESTRACK_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "TESTRACK_GENERAL_LOG_FORMAT");

        // Server
        override_string(
            &mut self.server.listen_addr,
            "TESTRACK_SERVER_LISTEN_ADDR",
        );
        override_u16(&mut self.server.port, "TESTRACK_SERVER_PORT");
        override_usize(&mut self.server.page_size, "TESTRACK_SERVER_PAGE_SIZE");
        override_usize(
            &mut self.server.max_page_size,
            "TESTRACK_SERVER_MAX_PAGE_SIZE",
        );

        // Auth
        override_string(&mut self.auth.username, "TESTRACK_AUTH_USERNAME");
        override_string(&mut self.auth.password, "TESTRACK_AUTH_PASSWORD");

        // Metrics
        override_bool(&mut self.metrics.enabled, "TESTRACK_METRICS_ENABLED");
        override_string(
            &mut self.metrics.listen_addr,
            "TESTRACK_METRICS_LISTEN_ADDR",
        );
        override_u16(&mut self.metrics.port, "TESTRACK_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TestrackError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.server.listen_addr.is_empty() {
            return Err(invalid("server.listen_addr", "must not be empty"));
        }
        if self.server.port == 0 {
            return Err(invalid("server.port", "must be between 1 and 65535"));
        }
        if self.server.page_size == 0 {
            return Err(invalid("server.page_size", "must be at least 1"));
        }
        if self.server.page_size > self.server.max_page_size {
            return Err(invalid(
                "server.page_size",
                format!(
                    "must not exceed server.max_page_size ({})",
                    self.server.max_page_size
                ),
            ));
        }

        if self.auth.username.is_empty() {
            return Err(invalid("auth.username", "must not be empty"));
        }
        if self.auth.username.contains(':') {
            return Err(invalid("auth.username", "must not contain ':'"));
        }
        if self.auth.password.is_empty() {
            return Err(invalid("auth.password", "must not be empty"));
        }

        if self.metrics.enabled {
            if self.metrics.endpoint != "/metrics" {
                return Err(invalid(
                    "metrics.endpoint",
                    "only '/metrics' is currently supported",
                ));
            }
            if self.metrics.port == 0 {
                return Err(invalid("metrics.port", "must be between 1 and 65535"));
            }
            if self.metrics.port == self.server.port
                && self.metrics.listen_addr == self.server.listen_addr
            {
                return Err(invalid(
                    "metrics.port",
                    "must differ from server.port on the same address",
                ));
            }
        }

        Ok(())
    }

    /// 기본 개발용 자격 증명을 그대로 쓰고 있는지 여부
    pub fn uses_default_credentials(&self) -> bool {
        self.auth.username == DEFAULT_USERNAME && self.auth.password == DEFAULT_PASSWORD
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> TestrackError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// HTTP 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인드 주소
    pub listen_addr: String,
    /// 바인드 포트
    pub port: u16,
    /// 목록 기본 페이지 크기
    pub page_size: usize,
    /// 클라이언트가 요청할 수 있는 최대 페이지 크기
    pub max_page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1".to_owned(),
            port: 9405,
            page_size: 50,
            max_page_size: 500,
        }
    }
}

/// 인증 설정 (HTTP Basic)
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_owned(),
            password: DEFAULT_PASSWORD.to_owned(),
        }
    }
}

// 비밀번호가 로그에 남지 않도록 Debug를 직접 구현
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// Prometheus 리스너 주소
    pub listen_addr: String,
    /// Prometheus 리스너 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9406,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = TestrackConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.server.port, 9405);
        assert_eq!(config.server.page_size, 50);
        assert!(!config.metrics.enabled);
        assert!(config.uses_default_credentials());
    }

    #[test]
    fn default_config_passes_validation() {
        let config = TestrackConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = TestrackConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.listen_addr, "127.0.0.1");
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[server]
port = 8000

[auth]
password = "s3cret"
"#;
        let config = TestrackConfig::parse(toml).unwrap();
        assert_eq!(config.server.port, 8000);
        // page_size는 기본값 유지
        assert_eq!(config.server.page_size, 50);
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.auth.password, "s3cret");
        assert!(!config.uses_default_credentials());
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = TestrackConfig::parse("invalid = [[[toml");
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            TestrackError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = TestrackConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = TestrackConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut config = TestrackConfig::default();
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn validate_rejects_page_size_above_max() {
        let mut config = TestrackConfig::default();
        config.server.page_size = 1000;
        config.server.max_page_size = 100;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn validate_rejects_empty_password() {
        let mut config = TestrackConfig::default();
        config.auth.password = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("auth.password"));
    }

    #[test]
    fn validate_rejects_colon_in_username() {
        let mut config = TestrackConfig::default();
        config.auth.username = "ad:min".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("auth.username"));
    }

    #[test]
    fn validate_rejects_metrics_port_clash_when_enabled() {
        let mut config = TestrackConfig::default();
        config.metrics.enabled = true;
        config.metrics.port = config.server.port;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metrics.port"));
    }

    #[test]
    fn validate_ignores_metrics_endpoint_when_disabled() {
        let mut config = TestrackConfig::default();
        config.metrics.enabled = false;
        config.metrics.endpoint = "/stats".to_owned();
        config.validate().unwrap();
    }

    #[test]
    fn auth_debug_redacts_password() {
        let config = AuthConfig {
            username: "ci".to_owned(),
            password: "hunter2".to_owned(),
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("ci"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    #[serial]
    fn env_override_applies_typed_values() {
        let mut config = TestrackConfig::default();
        // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe {
            std::env::set_var("TESTRACK_SERVER_PORT", "9999");
            std::env::set_var("TESTRACK_METRICS_ENABLED", "true");
            std::env::set_var("TESTRACK_AUTH_PASSWORD", "from-env");
        }
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var("TESTRACK_SERVER_PORT");
            std::env::remove_var("TESTRACK_METRICS_ENABLED");
            std::env::remove_var("TESTRACK_AUTH_PASSWORD");
        }
        assert_eq!(config.server.port, 9999);
        assert!(config.metrics.enabled);
        assert_eq!(config.auth.password, "from-env");
    }

    #[test]
    #[serial]
    fn env_override_invalid_number_keeps_original() {
        let mut val: u16 = 9405;
        // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_TESTRACK_U16_BAD", "not-a-port") };
        override_u16(&mut val, "TEST_TESTRACK_U16_BAD");
        assert_eq!(val, 9405);
        unsafe { std::env::remove_var("TEST_TESTRACK_U16_BAD") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_TESTRACK_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = TestrackConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = TestrackConfig::parse(&toml_str).unwrap();
        assert_eq!(config.server.port, parsed.server.port);
        assert_eq!(config.auth.username, parsed.auth.username);
        assert_eq!(config.metrics.endpoint, parsed.metrics.endpoint);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = TestrackConfig::from_file("/nonexistent/path/testrack.toml").await;
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            TestrackError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn from_file_defers_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testrack.toml");
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        let config = TestrackConfig::from_file(&path).await.unwrap();

        assert_eq!(config.server.port, 0);
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn from_file_reads_written_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testrack.toml");
        std::fs::write(&path, "[server]\npage_size = 10\n").unwrap();
        let config = TestrackConfig::from_file(&path).await.unwrap();
        assert_eq!(config.server.page_size, 10);
    }
}
