//! 디스크립터 레지스트리: 소프트웨어 컴포넌트와 리눅스 배포판
//!
//! 두 디스크립터 모두 필드 튜플 전체가 유일성 키입니다.
//! 직접 생성(`create_*`)은 같은 튜플이 이미 있으면 `Conflict`로 거부하고,
//! 중첩 생성 경로는 [`DescriptorRegistry::find_or_create_distro`]로 기존 행을 재사용합니다.

use std::sync::Arc;

use testrack_core::error::ResourceError;
use testrack_core::types::{DistroSpec, LinuxDistro, SoftwareComponent, SoftwareComponentSpec};

use crate::catalog::{CatalogKind, Catalogs};
use crate::store::{State, Store, observe, record_created, require};

const COMPONENTS: &str = "softwarecomponents";
const DISTROS: &str = "linuxdistros";

/// upsert 결과: 새로 만들었는지, 기존 행을 재사용했는지
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert<T> {
    Created(T),
    Reused(T),
}

impl<T> Upsert<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::Reused(value) => value,
        }
    }
}

/// 디스크립터 레지스트리 핸들
#[derive(Debug, Clone)]
pub struct DescriptorRegistry {
    store: Arc<Store>,
}

impl DescriptorRegistry {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    // ─── SoftwareComponent ───────────────────────────────────────────

    /// 소프트웨어 컴포넌트를 등록합니다.
    ///
    /// # Errors
    /// - 빈 필수 필드: `MalformedPayload`
    /// - `kind`/`arch`가 카탈로그에 없음: `InvalidReference`
    /// - 같은 튜플이 이미 있음: `Conflict`
    pub async fn create_component(
        &self,
        spec: SoftwareComponentSpec,
    ) -> Result<SoftwareComponent, ResourceError> {
        let component = observe(COMPONENTS, self.insert_component(spec).await)?;
        record_created(COMPONENTS);
        tracing::info!(id = component.id, component = %component.spec, "software component registered");
        Ok(component)
    }

    async fn insert_component(
        &self,
        spec: SoftwareComponentSpec,
    ) -> Result<SoftwareComponent, ResourceError> {
        validate_component(self.store.catalogs(), &spec)?;

        let mut state = self.store.write().await;
        if state.component_keys.contains_key(&spec) {
            return Err(ResourceError::conflict(COMPONENTS, spec.to_string()));
        }

        let id = state.component_ids.next();
        state.component_keys.insert(spec.clone(), id);
        let component = SoftwareComponent { id, spec };
        state.components.insert(id, component.clone());
        Ok(component)
    }

    /// 등록 순서대로 모든 컴포넌트
    pub async fn list_components(&self) -> Vec<SoftwareComponent> {
        self.store.read().await.components.values().cloned().collect()
    }

    pub async fn get_component(&self, id: u64) -> Result<SoftwareComponent, ResourceError> {
        self.store
            .read()
            .await
            .components
            .get(&id)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(COMPONENTS, id.to_string()))
    }

    // ─── LinuxDistro ─────────────────────────────────────────────────

    /// 리눅스 배포판을 등록합니다.
    ///
    /// # Errors
    /// - 빈 필수 필드: `MalformedPayload`
    /// - `arch`가 카탈로그에 없음: `InvalidReference`
    /// - 같은 `(arch, name, release, version)`이 이미 있음: `Conflict`
    pub async fn create_distro(&self, spec: DistroSpec) -> Result<LinuxDistro, ResourceError> {
        let result = match self.upsert_distro(spec).await {
            Ok(Upsert::Created(distro)) => Ok(distro),
            Ok(Upsert::Reused(existing)) => {
                Err(ResourceError::conflict(DISTROS, existing.spec.to_string()))
            }
            Err(err) => Err(err),
        };

        let distro = observe(DISTROS, result)?;
        tracing::info!(id = distro.id, distro = %distro.spec, "linux distro registered");
        Ok(distro)
    }

    /// 튜플이 같은 배포판이 있으면 재사용하고, 없으면 새로 만듭니다.
    ///
    /// 조회와 삽입은 하나의 쓰기 가드 안에서 이루어지므로 같은 튜플에 대한
    /// 동시 호출은 모두 같은 행으로 수렴합니다.
    pub async fn find_or_create_distro(
        &self,
        spec: DistroSpec,
    ) -> Result<Upsert<LinuxDistro>, ResourceError> {
        observe(DISTROS, self.upsert_distro(spec).await)
    }

    async fn upsert_distro(&self, spec: DistroSpec) -> Result<Upsert<LinuxDistro>, ResourceError> {
        let mut state = self.store.write().await;
        locked_find_or_create_distro(self.store.catalogs(), &mut state, spec)
    }

    /// 등록 순서대로 모든 배포판
    pub async fn list_distros(&self) -> Vec<LinuxDistro> {
        self.store.read().await.distros.values().cloned().collect()
    }

    pub async fn get_distro(&self, id: u64) -> Result<LinuxDistro, ResourceError> {
        self.store
            .read()
            .await
            .distros
            .get(&id)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(DISTROS, id.to_string()))
    }
}

fn validate_component(
    catalogs: &Catalogs,
    spec: &SoftwareComponentSpec,
) -> Result<(), ResourceError> {
    require("kind", &spec.kind)?;
    require("arch", &spec.arch)?;
    require("name", &spec.name)?;
    require("version", &spec.version)?;
    require("release", &spec.release)?;
    require("checksum", &spec.checksum)?;
    catalogs
        .get(CatalogKind::SoftwareComponentKind)
        .check_reference("kind", &spec.kind)?;
    catalogs
        .get(CatalogKind::SoftwareComponentArch)
        .check_reference("arch", &spec.arch)
}

fn validate_distro(catalogs: &Catalogs, spec: &DistroSpec) -> Result<(), ResourceError> {
    require("arch", &spec.arch)?;
    require("name", &spec.name)?;
    require("release", &spec.release)?;
    require("version", &spec.version)?;
    catalogs
        .get(CatalogKind::SoftwareComponentArch)
        .check_reference("arch", &spec.arch)
}

/// 쓰기 가드를 이미 쥔 호출자를 위한 find-or-create
///
/// 환경 조합기가 배포판 upsert와 환경 삽입을 한 가드 안에서 끝내기 위해 사용합니다.
pub(crate) fn locked_find_or_create_distro(
    catalogs: &Catalogs,
    state: &mut State,
    spec: DistroSpec,
) -> Result<Upsert<LinuxDistro>, ResourceError> {
    validate_distro(catalogs, &spec)?;

    if let Some(existing) = state
        .distro_keys
        .get(&spec)
        .and_then(|id| state.distros.get(id))
    {
        return Ok(Upsert::Reused(existing.clone()));
    }

    let id = state.distro_ids.next();
    state.distro_keys.insert(spec.clone(), id);
    let distro = LinuxDistro { id, spec };
    state.distros.insert(id, distro.clone());
    record_created(DISTROS);
    tracing::debug!(id, distro = %distro.spec, "linux distro stored");
    Ok(Upsert::Created(distro))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DescriptorRegistry {
        DescriptorRegistry::new(Store::seeded())
    }

    fn component(name: &str) -> SoftwareComponentSpec {
        SoftwareComponentSpec {
            kind: "unknown".to_owned(),
            arch: "unknown".to_owned(),
            name: name.to_owned(),
            version: "1.0".to_owned(),
            release: "1".to_owned(),
            checksum: "abc123".to_owned(),
        }
    }

    fn distro(name: &str) -> DistroSpec {
        DistroSpec {
            arch: "unknown".to_owned(),
            name: name.to_owned(),
            release: "0".to_owned(),
            version: "0".to_owned(),
        }
    }

    #[tokio::test]
    async fn create_component_assigns_sequential_ids() {
        let registry = registry();
        let first = registry.create_component(component("bash")).await.unwrap();
        let second = registry.create_component(component("zsh")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(registry.list_components().await.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_component_tuple_conflicts() {
        let registry = registry();
        registry.create_component(component("bash")).await.unwrap();
        let err = registry
            .create_component(component("bash"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Conflict { .. }));
        assert_eq!(registry.list_components().await.len(), 1);
    }

    #[tokio::test]
    async fn component_with_unknown_arch_is_invalid_reference() {
        let registry = registry();
        let mut spec = component("bash");
        spec.arch = "x86_64".to_owned();
        let err = registry.create_component(spec).await.unwrap_err();
        assert_eq!(err, ResourceError::invalid_reference("arch", "x86_64"));
    }

    #[tokio::test]
    async fn component_with_empty_checksum_is_malformed() {
        let registry = registry();
        let mut spec = component("bash");
        spec.checksum.clear();
        let err = registry.create_component(spec).await.unwrap_err();
        assert!(matches!(err, ResourceError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn duplicate_distro_conflicts() {
        let registry = registry();
        registry.create_distro(distro("avocadix")).await.unwrap();
        let err = registry.create_distro(distro("avocadix")).await.unwrap_err();
        assert!(matches!(err, ResourceError::Conflict { .. }));
        assert_eq!(registry.list_distros().await.len(), 1);
    }

    #[tokio::test]
    async fn distro_tuple_differs_by_release() {
        let registry = registry();
        registry.create_distro(distro("avocadix")).await.unwrap();
        let mut other = distro("avocadix");
        other.release = "1".to_owned();
        registry.create_distro(other).await.unwrap();
        assert_eq!(registry.list_distros().await.len(), 2);
    }

    #[tokio::test]
    async fn find_or_create_reuses_existing_row() {
        let registry = registry();
        let created = registry
            .find_or_create_distro(distro("avocadix"))
            .await
            .unwrap();
        assert!(created.is_created());
        let reused = registry
            .find_or_create_distro(distro("avocadix"))
            .await
            .unwrap();
        assert!(!reused.is_created());
        assert_eq!(created.into_inner().id, reused.into_inner().id);
        assert_eq!(registry.list_distros().await.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_descriptor_is_not_found() {
        let registry = registry();
        assert!(matches!(
            registry.get_component(42).await.unwrap_err(),
            ResourceError::NotFound { .. }
        ));
        assert!(matches!(
            registry.get_distro(42).await.unwrap_err(),
            ResourceError::NotFound { .. }
        ));
    }
}
