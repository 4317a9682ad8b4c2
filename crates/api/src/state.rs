//! 핸들러 공유 상태

use std::sync::Arc;

use testrack_core::config::TestrackConfig;
use testrack_registry::{
    Catalogs, DescriptorRegistry, EnvironmentComposer, JobLifecycleManager, Store,
};

use crate::pagination::PageConfig;

/// 라우터 상태
///
/// 모든 핸들은 같은 [`Store`]를 공유하므로 한 요청이 커밋한 변경은
/// 다음 요청에서 바로 보입니다.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalogs: Arc<Catalogs>,
    pub descriptors: DescriptorRegistry,
    pub environments: EnvironmentComposer,
    pub jobs: JobLifecycleManager,
    pub paging: PageConfig,
}

impl AppState {
    pub fn new(store: Arc<Store>, paging: PageConfig) -> Self {
        Self {
            catalogs: Arc::clone(store.catalogs()),
            descriptors: DescriptorRegistry::new(Arc::clone(&store)),
            environments: EnvironmentComposer::new(Arc::clone(&store)),
            jobs: JobLifecycleManager::new(store),
            paging,
        }
    }

    /// 시드 카탈로그와 빈 저장소로 상태를 만듭니다.
    pub fn from_config(config: &TestrackConfig) -> Self {
        Self::new(Store::seeded(), PageConfig::from_config(&config.server))
    }
}
