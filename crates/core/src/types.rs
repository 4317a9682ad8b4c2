//! 도메인 타입: 서버 전역에서 사용되는 엔티티 표현
//!
//! `*Spec` 타입은 클라이언트 입력(생성 요청)이고, 나머지는 서버가 돌려주는
//! 전체 표현입니다. 문자열 필드는 정확히 일치(exact match)로 비교하며
//! 공백 제거나 대소문자 정규화를 하지 않습니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 레퍼런스 카탈로그 엔트리
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ─── Descriptor ──────────────────────────────────────────────────────

/// 소프트웨어 컴포넌트 생성 요청
///
/// 유일성 키는 필드 전체 튜플입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoftwareComponentSpec {
    /// SoftwareComponentKind 카탈로그 참조
    pub kind: String,
    /// SoftwareComponentArch 카탈로그 참조
    pub arch: String,
    pub name: String,
    pub version: String,
    pub release: String,
    pub checksum: String,
}

impl fmt::Display for SoftwareComponentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}.{} (kind={}, checksum={})",
            self.name, self.version, self.release, self.arch, self.kind, self.checksum
        )
    }
}

/// 저장된 소프트웨어 컴포넌트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareComponent {
    /// 서버 할당 식별자
    pub id: u64,
    #[serde(flatten)]
    pub spec: SoftwareComponentSpec,
}

/// 리눅스 배포판 디스크립터 (생성 요청 겸 중첩 표현)
///
/// 유일성 키: `(arch, name, release, version)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistroSpec {
    /// SoftwareComponentArch 카탈로그 참조
    pub arch: String,
    pub name: String,
    pub release: String,
    pub version: String,
}

impl fmt::Display for DistroSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{} ({})",
            self.name, self.version, self.release, self.arch
        )
    }
}

/// 저장된 리눅스 배포판
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinuxDistro {
    pub id: u64,
    #[serde(flatten)]
    pub spec: DistroSpec,
}

// ─── Environment ─────────────────────────────────────────────────────

/// 테스트 환경 생성 요청
///
/// 중첩 객체를 포함하므로 구조화 문서(JSON)로만 전달될 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEnvironmentSpec {
    pub distro: DistroSpec,
}

/// 저장된 테스트 환경
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEnvironment {
    pub id: u64,
    pub distro: LinuxDistro,
}

// ─── Job ─────────────────────────────────────────────────────────────

/// 잡 생성 요청
///
/// `activities`/`tests`는 서버 소유 필드이므로 입력에 있어도 무시됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// 클라이언트가 지정하는 기본 키
    pub id: String,
    pub name: String,
    /// JobPriority 카탈로그 참조
    pub priority: String,
    /// JobStatus 카탈로그 참조
    pub status: String,
    /// 타임아웃 (초, 생략 시 0)
    #[serde(default)]
    pub timeout: u64,
}

/// 잡 전체 표현
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub priority: String,
    pub status: String,
    pub timeout: u64,
    pub activities: Vec<Activity>,
    pub tests: Vec<TestResult>,
}

impl Job {
    /// 빈 하위 컬렉션으로 새 잡 표현을 만듭니다.
    pub fn from_spec(spec: JobSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name,
            priority: spec.priority,
            status: spec.status,
            timeout: spec.timeout,
            activities: Vec::new(),
            tests: Vec::new(),
        }
    }
}

/// 잡 액티비티 추가 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySpec {
    pub activity: String,
    /// 생략 시 서버 수신 시각
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// 잡에 속한 액티비티 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub activity: String,
    pub time: DateTime<Utc>,
}

/// 테스트 결과 추가 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSpec {
    /// 테스트 식별 태그
    pub tag: String,
    /// TestStatus 카탈로그 참조
    pub status: String,
}

/// 잡에 속한 테스트 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: u64,
    pub tag: String,
    pub status: String,
}

/// `/version/` 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
}

impl VersionInfo {
    /// 현재 빌드의 버전 정보
    pub fn current() -> Self {
        Self {
            name: "testrack".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_from_spec_starts_with_empty_collections() {
        let job = Job::from_spec(JobSpec {
            id: "a0a272a0".to_owned(),
            name: "foobar job".to_owned(),
            priority: "MEDIUM".to_owned(),
            status: "NOSTATUS".to_owned(),
            timeout: 0,
        });
        assert!(job.activities.is_empty());
        assert!(job.tests.is_empty());
    }

    #[test]
    fn job_spec_timeout_defaults_to_zero() {
        let spec: JobSpec = serde_json::from_str(
            r#"{"id":"x","name":"n","priority":"LOW","status":"PASS"}"#,
        )
        .unwrap();
        assert_eq!(spec.timeout, 0);
    }

    #[test]
    fn job_spec_ignores_server_owned_fields() {
        let spec: JobSpec = serde_json::from_str(
            r#"{"id":"x","name":"n","priority":"LOW","status":"PASS",
                "activities":[{"activity":"boot"}],"tests":[1,2]}"#,
        )
        .unwrap();
        assert_eq!(spec.id, "x");
    }

    #[test]
    fn job_representation_field_set() {
        let job = Job::from_spec(JobSpec {
            id: "X".to_owned(),
            name: "foobar job".to_owned(),
            priority: "MEDIUM".to_owned(),
            status: "NOSTATUS".to_owned(),
            timeout: 0,
        });
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "X",
                "name": "foobar job",
                "priority": "MEDIUM",
                "status": "NOSTATUS",
                "timeout": 0,
                "activities": [],
                "tests": []
            })
        );
    }

    #[test]
    fn linux_distro_serializes_flat() {
        let distro = LinuxDistro {
            id: 3,
            spec: DistroSpec {
                arch: "unknown".to_owned(),
                name: "avocadix".to_owned(),
                release: "1".to_owned(),
                version: "0".to_owned(),
            },
        };
        let value = serde_json::to_value(&distro).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["name"], "avocadix");
        assert!(value.get("spec").is_none());
    }

    #[test]
    fn environment_spec_requires_nested_distro() {
        let result = serde_json::from_str::<TestEnvironmentSpec>(r#"{"arch":"unknown"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn activity_spec_parses_rfc3339_time() {
        let spec: ActivitySpec =
            serde_json::from_str(r#"{"activity":"setup","time":"2024-05-01T10:00:00Z"}"#)
                .unwrap();
        let time = spec.time.expect("time should be parsed");
        assert_eq!(time.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn version_info_reports_crate_version() {
        let info = VersionInfo::current();
        assert_eq!(info.name, "testrack");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
