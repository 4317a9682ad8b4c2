//! 테스트 환경 조합기
//!
//! 환경 생성 요청은 중첩된 배포판 튜플을 담고 있습니다. 같은 튜플의 배포판이 있으면
//! 그 행을 참조하고, 없으면 먼저 배포판을 만든 뒤 환경을 만듭니다.
//! 배포판 upsert와 환경 삽입은 한 번의 쓰기 가드 안에서 끝나므로,
//! 중간에 실패하면 아무것도 남지 않습니다.

use std::sync::Arc;

use testrack_core::error::ResourceError;
use testrack_core::metrics as m;
use testrack_core::types::{TestEnvironment, TestEnvironmentSpec};

use crate::descriptor::{Upsert, locked_find_or_create_distro};
use crate::store::{EnvironmentRecord, State, Store, observe, record_created};

const ENVIRONMENTS: &str = "testenvironments";

/// 테스트 환경 조합기 핸들
#[derive(Debug, Clone)]
pub struct EnvironmentComposer {
    store: Arc<Store>,
}

impl EnvironmentComposer {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// 테스트 환경을 만들고 중첩 배포판을 upsert합니다.
    ///
    /// # Errors
    /// - 배포판 필드가 비어 있음: `MalformedPayload`
    /// - 배포판 `arch`가 카탈로그에 없음: `InvalidReference` (아무것도 저장되지 않음)
    pub async fn create_environment(
        &self,
        spec: TestEnvironmentSpec,
    ) -> Result<TestEnvironment, ResourceError> {
        let result = {
            let mut state = self.store.write().await;
            compose(&self.store, &mut state, spec)
        };
        let (environment, reused) = observe(ENVIRONMENTS, result)?;

        record_created(ENVIRONMENTS);
        if reused {
            metrics::counter!(m::REGISTRY_DISTROS_REUSED_TOTAL).increment(1);
        }
        tracing::info!(
            id = environment.id,
            distro_id = environment.distro.id,
            distro = %environment.distro.spec,
            reused_distro = reused,
            "test environment created"
        );
        Ok(environment)
    }

    /// 생성 순서대로 모든 환경 (배포판 표현을 펼쳐서 반환)
    pub async fn list_environments(&self) -> Vec<TestEnvironment> {
        let state = self.store.read().await;
        state
            .environments
            .values()
            .filter_map(|record| resolve(&state, record))
            .collect()
    }

    pub async fn get_environment(&self, id: u64) -> Result<TestEnvironment, ResourceError> {
        let state = self.store.read().await;
        state
            .environments
            .get(&id)
            .and_then(|record| resolve(&state, record))
            .ok_or_else(|| ResourceError::not_found(ENVIRONMENTS, id.to_string()))
    }
}

fn compose(
    store: &Store,
    state: &mut State,
    spec: TestEnvironmentSpec,
) -> Result<(TestEnvironment, bool), ResourceError> {
    let upsert = locked_find_or_create_distro(store.catalogs(), state, spec.distro)?;
    let reused = matches!(upsert, Upsert::Reused(_));
    let distro = upsert.into_inner();

    let id = state.environment_ids.next();
    state.environments.insert(
        id,
        EnvironmentRecord {
            id,
            distro_id: distro.id,
        },
    );
    Ok((TestEnvironment { id, distro }, reused))
}

fn resolve(state: &State, record: &EnvironmentRecord) -> Option<TestEnvironment> {
    state
        .distros
        .get(&record.distro_id)
        .map(|distro| TestEnvironment {
            id: record.id,
            distro: distro.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DescriptorRegistry;
    use testrack_core::types::DistroSpec;

    fn unknown_distro() -> DistroSpec {
        DistroSpec {
            arch: "unknown".to_owned(),
            name: "unknown".to_owned(),
            release: "0".to_owned(),
            version: "0".to_owned(),
        }
    }

    #[tokio::test]
    async fn creates_distro_when_absent() {
        let store = Store::seeded();
        let composer = EnvironmentComposer::new(Arc::clone(&store));
        let registry = DescriptorRegistry::new(store);

        let env = composer
            .create_environment(TestEnvironmentSpec {
                distro: unknown_distro(),
            })
            .await
            .unwrap();

        assert_eq!(env.id, 1);
        assert_eq!(env.distro.spec, unknown_distro());
        assert_eq!(registry.list_distros().await.len(), 1);
    }

    #[tokio::test]
    async fn reuses_existing_distro() {
        let store = Store::seeded();
        let composer = EnvironmentComposer::new(Arc::clone(&store));
        let registry = DescriptorRegistry::new(store);
        let existing = registry.create_distro(unknown_distro()).await.unwrap();

        let first = composer
            .create_environment(TestEnvironmentSpec {
                distro: unknown_distro(),
            })
            .await
            .unwrap();
        let second = composer
            .create_environment(TestEnvironmentSpec {
                distro: unknown_distro(),
            })
            .await
            .unwrap();

        assert_eq!(first.distro.id, existing.id);
        assert_eq!(second.distro.id, existing.id);
        assert_ne!(first.id, second.id);
        assert_eq!(registry.list_distros().await.len(), 1);
        assert_eq!(composer.list_environments().await.len(), 2);
    }

    #[tokio::test]
    async fn invalid_distro_arch_leaves_nothing_behind() {
        let store = Store::seeded();
        let composer = EnvironmentComposer::new(Arc::clone(&store));
        let registry = DescriptorRegistry::new(store);

        let mut distro = unknown_distro();
        distro.arch = "sparc".to_owned();
        let err = composer
            .create_environment(TestEnvironmentSpec { distro })
            .await
            .unwrap_err();

        assert_eq!(err, ResourceError::invalid_reference("arch", "sparc"));
        assert!(registry.list_distros().await.is_empty());
        assert!(composer.list_environments().await.is_empty());
    }

    #[tokio::test]
    async fn get_missing_environment_is_not_found() {
        let composer = EnvironmentComposer::new(Store::seeded());
        assert!(matches!(
            composer.get_environment(7).await.unwrap_err(),
            ResourceError::NotFound { .. }
        ));
    }
}
