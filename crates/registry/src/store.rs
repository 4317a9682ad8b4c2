//! 엔티티 저장소: 모든 가변 상태를 하나의 `RwLock` 아래에 둡니다.
//!
//! 검증, 유일성 검사, 삽입은 항상 같은 쓰기 가드 안에서 수행되므로
//! 같은 튜플에 대한 동시 생성 두 건이 모두 성공할 수 없고, 잡의 연쇄 삭제가
//! 중간 상태로 관찰되지 않습니다.
//!
//! # 락 순서
//! 카탈로그는 불변이므로 락이 없습니다. 상태 락은 하나뿐이라 교착이 없습니다.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use testrack_core::error::ResourceError;
use testrack_core::metrics as m;
use testrack_core::types::{
    DistroSpec, Job, LinuxDistro, SoftwareComponent, SoftwareComponentSpec,
};

use crate::catalog::Catalogs;

/// 단조 증가 식별자 생성기 (1부터 시작)
#[derive(Debug, Default)]
pub(crate) struct Sequence(u64);

impl Sequence {
    pub(crate) fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// 저장된 테스트 환경 (배포판은 id로 참조)
#[derive(Debug, Clone)]
pub(crate) struct EnvironmentRecord {
    pub(crate) id: u64,
    pub(crate) distro_id: u64,
}

/// 락으로 보호되는 전체 상태
///
/// `BTreeMap<u64, _>`의 키는 삽입 순서를 따르는 시퀀스이므로
/// 순회 순서가 곧 생성 순서입니다.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) components: BTreeMap<u64, SoftwareComponent>,
    pub(crate) component_keys: HashMap<SoftwareComponentSpec, u64>,
    pub(crate) component_ids: Sequence,

    pub(crate) distros: BTreeMap<u64, LinuxDistro>,
    pub(crate) distro_keys: HashMap<DistroSpec, u64>,
    pub(crate) distro_ids: Sequence,

    pub(crate) environments: BTreeMap<u64, EnvironmentRecord>,
    pub(crate) environment_ids: Sequence,

    /// 잡 삽입 시퀀스 → 잡
    pub(crate) jobs: BTreeMap<u64, Job>,
    /// 클라이언트 잡 id → 삽입 시퀀스
    pub(crate) job_keys: HashMap<String, u64>,
    pub(crate) job_seq: Sequence,

    pub(crate) activity_ids: Sequence,
    pub(crate) test_ids: Sequence,
}

/// 공유 엔티티 저장소
///
/// 모든 컴포넌트 핸들([`DescriptorRegistry`](crate::DescriptorRegistry),
/// [`EnvironmentComposer`](crate::EnvironmentComposer),
/// [`JobLifecycleManager`](crate::JobLifecycleManager))이 `Arc<Store>`를 공유합니다.
#[derive(Debug)]
pub struct Store {
    catalogs: Arc<Catalogs>,
    state: RwLock<State>,
}

impl Store {
    /// 주어진 카탈로그로 빈 저장소를 만듭니다.
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self {
            catalogs,
            state: RwLock::new(State::default()),
        }
    }

    /// 고정 시드 카탈로그로 빈 저장소를 만듭니다.
    pub fn seeded() -> Arc<Self> {
        Arc::new(Self::new(Arc::new(Catalogs::seeded())))
    }

    pub fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().await
    }
}

/// 필수 문자열 필드 검증
pub(crate) fn require(field: &str, value: &str) -> Result<(), ResourceError> {
    if value.is_empty() {
        Err(ResourceError::malformed(format!("'{field}' must not be empty")))
    } else {
        Ok(())
    }
}

/// 작업 결과를 메트릭에 반영하고 그대로 돌려줍니다.
pub(crate) fn observe<T>(
    resource: &'static str,
    result: Result<T, ResourceError>,
) -> Result<T, ResourceError> {
    if let Err(err) = &result {
        tracing::debug!(resource, kind = %err.kind(), error = %err, "operation rejected");
        metrics::counter!(m::REGISTRY_REJECTIONS_TOTAL, m::LABEL_KIND => err.kind().as_str())
            .increment(1);
    }
    result
}

pub(crate) fn record_created(resource: &'static str) {
    metrics::counter!(m::REGISTRY_RESOURCES_CREATED_TOTAL, m::LABEL_RESOURCE => resource)
        .increment(1);
}

pub(crate) fn record_deleted(resource: &'static str, count: u64) {
    if count > 0 {
        metrics::counter!(m::REGISTRY_RESOURCES_DELETED_TOTAL, m::LABEL_RESOURCE => resource)
            .increment(count);
    }
}
