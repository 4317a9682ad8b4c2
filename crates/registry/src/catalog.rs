//! 레퍼런스 카탈로그: 시작 시 한 번 시드되는 불변 어휘집
//!
//! [`Catalogs`]는 고정 테이블 [`CatalogKind::seed`]로부터 구성되며,
//! 이후 어떤 경로로도 변경되지 않습니다. 요청 핸들러에는 `Arc<Catalogs>`로
//! 주입되고 전역 상태로 접근하지 않습니다.
//!
//! 생성/삭제 시도는 항상 [`ResourceError::PolicyRejection`]으로 거부되며,
//! 이는 검증 실패와 구별되는 영구적 정책 거부입니다.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use testrack_core::error::ResourceError;
use testrack_core::metrics as m;
use testrack_core::types::CatalogEntry;

/// 카탈로그 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    JobStatus,
    JobPriority,
    TestStatus,
    SoftwareComponentKind,
    SoftwareComponentArch,
}

impl CatalogKind {
    /// 모든 카탈로그 (시드 순서)
    pub const ALL: [CatalogKind; 5] = [
        Self::JobStatus,
        Self::JobPriority,
        Self::TestStatus,
        Self::SoftwareComponentKind,
        Self::SoftwareComponentArch,
    ];

    /// 외부 리소스 이름 (URL 경로 세그먼트)
    pub fn resource(&self) -> &'static str {
        match self {
            Self::JobStatus => "jobstatuses",
            Self::JobPriority => "jobpriorities",
            Self::TestStatus => "teststatuses",
            Self::SoftwareComponentKind => "softwarecomponentkinds",
            Self::SoftwareComponentArch => "softwarecomponentarches",
        }
    }

    /// 시드 엔트리 이름 (외부 계약의 일부이므로 순서와 철자를 바꾸지 않습니다)
    pub fn seed(&self) -> &'static [&'static str] {
        match self {
            Self::JobStatus => &[
                "TEST_NA", "ABORT", "ERROR", "FAIL", "WARN", "PASS", "START", "ALERT", "RUNNING",
                "NOSTATUS",
            ],
            Self::JobPriority => &["LOW", "MEDIUM", "HIGH", "URGENT"],
            Self::TestStatus => &["PASS", "ERROR", "FAIL", "TEST_NA", "WARN"],
            Self::SoftwareComponentKind => &["unknown"],
            Self::SoftwareComponentArch => &["unknown"],
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

impl FromStr for CatalogKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.resource() == s)
            .ok_or_else(|| ResourceError::not_found("catalog", s))
    }
}

/// 단일 어휘집
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    kind: CatalogKind,
    entries: Vec<CatalogEntry>,
    names: HashSet<String>,
}

impl ReferenceCatalog {
    fn seeded(kind: CatalogKind) -> Self {
        let entries: Vec<CatalogEntry> = kind
            .seed()
            .iter()
            .copied()
            .map(CatalogEntry::new)
            .collect();
        let names = entries.iter().map(|e| e.name.clone()).collect();
        Self {
            kind,
            entries,
            names,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    /// 시드 순서대로 모든 엔트리
    pub fn list(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 이름이 카탈로그에 있는지 (정확히 일치)
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn get_by_name(&self, name: &str) -> Result<&CatalogEntry, ResourceError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ResourceError::not_found(self.kind.resource(), name))
    }

    /// 참조 필드 검증: 카탈로그에 없는 값이면 `InvalidReference`
    pub fn check_reference(&self, field: &str, value: &str) -> Result<(), ResourceError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(ResourceError::invalid_reference(field, value))
        }
    }

    /// 생성 시도: 페이로드와 무관하게 항상 거부합니다.
    ///
    /// 본문을 해석하지 못한 요청도 같은 거부를 받아야 하므로 엔트리는 선택적입니다.
    pub fn create(&self, entry: Option<&CatalogEntry>) -> Result<CatalogEntry, ResourceError> {
        let name = entry.map(|e| e.name.as_str()).unwrap_or_default();
        Err(self.reject("create", name))
    }

    /// 삭제 시도: 항상 거부합니다.
    pub fn delete(&self, name: &str) -> Result<(), ResourceError> {
        Err(self.reject("delete", name))
    }

    fn reject(&self, action: &'static str, name: &str) -> ResourceError {
        let err = ResourceError::policy_rejection(self.kind.resource());
        tracing::warn!(
            catalog = %self.kind,
            action,
            name,
            "mutation of read-only catalog rejected"
        );
        metrics::counter!(m::REGISTRY_REJECTIONS_TOTAL, m::LABEL_KIND => err.kind().as_str())
            .increment(1);
        err
    }
}

/// 모든 레퍼런스 카탈로그
#[derive(Debug, Clone)]
pub struct Catalogs {
    job_status: ReferenceCatalog,
    job_priority: ReferenceCatalog,
    test_status: ReferenceCatalog,
    component_kind: ReferenceCatalog,
    component_arch: ReferenceCatalog,
}

impl Catalogs {
    /// 고정 시드 테이블로 카탈로그를 구성합니다.
    pub fn seeded() -> Self {
        let catalogs = Self {
            job_status: ReferenceCatalog::seeded(CatalogKind::JobStatus),
            job_priority: ReferenceCatalog::seeded(CatalogKind::JobPriority),
            test_status: ReferenceCatalog::seeded(CatalogKind::TestStatus),
            component_kind: ReferenceCatalog::seeded(CatalogKind::SoftwareComponentKind),
            component_arch: ReferenceCatalog::seeded(CatalogKind::SoftwareComponentArch),
        };
        tracing::debug!(
            job_statuses = catalogs.job_status.len(),
            job_priorities = catalogs.job_priority.len(),
            test_statuses = catalogs.test_status.len(),
            "reference catalogs seeded"
        );
        catalogs
    }

    pub fn get(&self, kind: CatalogKind) -> &ReferenceCatalog {
        match kind {
            CatalogKind::JobStatus => &self.job_status,
            CatalogKind::JobPriority => &self.job_priority,
            CatalogKind::TestStatus => &self.test_status,
            CatalogKind::SoftwareComponentKind => &self.component_kind,
            CatalogKind::SoftwareComponentArch => &self.component_arch,
        }
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::seeded()
    }
}
