//! 잡 수명주기 관리자
//!
//! 잡은 클라이언트가 지정한 문자열 id로 식별되며, 액티비티와 테스트 결과를 소유합니다.
//! 잡을 삭제하면 소유한 하위 레코드가 같은 쓰기 가드 안에서 함께 사라지므로
//! 잡이 없는 액티비티나 테스트 결과는 관찰될 수 없습니다.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;

use testrack_core::error::ResourceError;
use testrack_core::metrics as m;
use testrack_core::types::{Activity, ActivitySpec, Job, JobSpec, TestResult, TestSpec};

use crate::catalog::{CatalogKind, Catalogs};
use crate::store::{State, Store, observe, record_created, record_deleted, require};

const JOBS: &str = "jobs";
const ACTIVITIES: &str = "activities";
const TESTS: &str = "tests";

/// 잡 수명주기 관리자 핸들
#[derive(Debug, Clone)]
pub struct JobLifecycleManager {
    store: Arc<Store>,
}

impl JobLifecycleManager {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// 잡을 만듭니다. 하위 컬렉션은 비어 있는 상태로 시작합니다.
    ///
    /// # Errors
    /// - `id`/`name` 비어 있음: `MalformedPayload`
    /// - `status`/`priority`가 카탈로그에 없음: `InvalidReference`
    /// - 같은 `id`의 잡이 이미 있음: `Conflict`
    pub async fn create_job(&self, spec: JobSpec) -> Result<Job, ResourceError> {
        let job = observe(JOBS, self.insert_job(spec).await)?;
        record_created(JOBS);
        tracing::info!(
            job_id = %job.id,
            name = %job.name,
            status = %job.status,
            priority = %job.priority,
            "job created"
        );
        Ok(job)
    }

    async fn insert_job(&self, spec: JobSpec) -> Result<Job, ResourceError> {
        validate_job(self.store.catalogs(), &spec)?;

        let mut state = self.store.write().await;
        if state.job_keys.contains_key(&spec.id) {
            return Err(ResourceError::conflict(JOBS, spec.id));
        }

        let seq = state.job_seq.next();
        let job = Job::from_spec(spec);
        state.job_keys.insert(job.id.clone(), seq);
        state.jobs.insert(seq, job.clone());
        update_stored_gauge(&state);
        Ok(job)
    }

    /// 생성 순서대로 모든 잡
    pub async fn list_jobs(&self) -> Vec<Job> {
        self.store.read().await.jobs.values().cloned().collect()
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, ResourceError> {
        let state = self.store.read().await;
        observe(JOBS, job_ref(&state, id).cloned())
    }

    /// 잡과 잡이 소유한 모든 액티비티/테스트 결과를 삭제합니다.
    ///
    /// # Errors
    /// - 잡이 없음: `NotFound`
    pub async fn delete_job(&self, id: &str) -> Result<(), ResourceError> {
        let result = {
            let mut state = self.store.write().await;
            let state = &mut *state;
            let removed = state
                .job_keys
                .remove(id)
                .and_then(|seq| state.jobs.remove(&seq));
            if removed.is_some() {
                update_stored_gauge(state);
            }
            removed.ok_or_else(|| ResourceError::not_found(JOBS, id))
        };
        let job = observe(JOBS, result)?;

        record_deleted(JOBS, 1);
        record_deleted(ACTIVITIES, job.activities.len() as u64);
        record_deleted(TESTS, job.tests.len() as u64);
        tracing::info!(
            job_id = %job.id,
            activities = job.activities.len(),
            tests = job.tests.len(),
            "job deleted"
        );
        Ok(())
    }

    // ─── Activities ──────────────────────────────────────────────────

    pub async fn list_activities(&self, job_id: &str) -> Result<Vec<Activity>, ResourceError> {
        let state = self.store.read().await;
        observe(
            ACTIVITIES,
            job_ref(&state, job_id).map(|job| job.activities.clone()),
        )
    }

    /// 잡에 액티비티를 추가합니다. `time`이 없으면 수신 시각을 씁니다.
    pub async fn add_activity(
        &self,
        job_id: &str,
        spec: ActivitySpec,
    ) -> Result<Activity, ResourceError> {
        let result = async {
            let mut state = self.store.write().await;
            let state = &mut *state;
            let job = job_mut(&mut state.jobs, &state.job_keys, job_id)?;
            require("activity", &spec.activity)?;
            let activity = Activity {
                id: state.activity_ids.next(),
                activity: spec.activity,
                time: spec.time.unwrap_or_else(Utc::now),
            };
            job.activities.push(activity.clone());
            Ok::<_, ResourceError>(activity)
        }
        .await;
        let activity = observe(ACTIVITIES, result)?;

        record_created(ACTIVITIES);
        tracing::debug!(
            job_id,
            activity_id = activity.id,
            activity = %activity.activity,
            "activity added"
        );
        Ok(activity)
    }

    pub async fn remove_activity(
        &self,
        job_id: &str,
        activity_id: u64,
    ) -> Result<(), ResourceError> {
        let result = {
            let mut state = self.store.write().await;
            let state = &mut *state;
            job_mut(&mut state.jobs, &state.job_keys, job_id).and_then(|job| {
                let index = job
                    .activities
                    .iter()
                    .position(|a| a.id == activity_id)
                    .ok_or_else(|| ResourceError::not_found(ACTIVITIES, activity_id.to_string()))?;
                job.activities.remove(index);
                Ok(())
            })
        };
        observe(ACTIVITIES, result)?;

        record_deleted(ACTIVITIES, 1);
        tracing::debug!(job_id, activity_id, "activity removed");
        Ok(())
    }

    // ─── Tests ───────────────────────────────────────────────────────

    pub async fn list_tests(&self, job_id: &str) -> Result<Vec<TestResult>, ResourceError> {
        let state = self.store.read().await;
        observe(TESTS, job_ref(&state, job_id).map(|job| job.tests.clone()))
    }

    /// 잡에 테스트 결과를 추가합니다.
    ///
    /// 잡 조회가 페이로드 검증보다 먼저이므로 없는 잡에는 항상 `NotFound`입니다.
    ///
    /// # Errors
    /// - 잡이 없음: `NotFound`
    /// - `tag` 비어 있음: `MalformedPayload`
    /// - `status`가 TestStatus 카탈로그에 없음: `InvalidReference`
    pub async fn add_test(
        &self,
        job_id: &str,
        spec: TestSpec,
    ) -> Result<TestResult, ResourceError> {
        let result = async {
            let mut state = self.store.write().await;
            let state = &mut *state;
            let job = job_mut(&mut state.jobs, &state.job_keys, job_id)?;

            require("tag", &spec.tag)?;
            require("status", &spec.status)?;
            self.store
                .catalogs()
                .get(CatalogKind::TestStatus)
                .check_reference("status", &spec.status)?;
            let test = TestResult {
                id: state.test_ids.next(),
                tag: spec.tag,
                status: spec.status,
            };
            job.tests.push(test.clone());
            Ok::<_, ResourceError>(test)
        }
        .await;
        let test = observe(TESTS, result)?;

        record_created(TESTS);
        tracing::debug!(
            job_id,
            test_id = test.id,
            tag = %test.tag,
            status = %test.status,
            "test result added"
        );
        Ok(test)
    }

    pub async fn remove_test(&self, job_id: &str, test_id: u64) -> Result<(), ResourceError> {
        let result = {
            let mut state = self.store.write().await;
            let state = &mut *state;
            job_mut(&mut state.jobs, &state.job_keys, job_id).and_then(|job| {
                let index = job
                    .tests
                    .iter()
                    .position(|t| t.id == test_id)
                    .ok_or_else(|| ResourceError::not_found(TESTS, test_id.to_string()))?;
                job.tests.remove(index);
                Ok(())
            })
        };
        observe(TESTS, result)?;

        record_deleted(TESTS, 1);
        tracing::debug!(job_id, test_id, "test result removed");
        Ok(())
    }
}

fn validate_job(catalogs: &Catalogs, spec: &JobSpec) -> Result<(), ResourceError> {
    require("id", &spec.id)?;
    require("name", &spec.name)?;
    require("priority", &spec.priority)?;
    require("status", &spec.status)?;
    catalogs
        .get(CatalogKind::JobPriority)
        .check_reference("priority", &spec.priority)?;
    catalogs
        .get(CatalogKind::JobStatus)
        .check_reference("status", &spec.status)
}

fn job_ref<'a>(state: &'a State, id: &str) -> Result<&'a Job, ResourceError> {
    state
        .job_keys
        .get(id)
        .and_then(|seq| state.jobs.get(seq))
        .ok_or_else(|| ResourceError::not_found(JOBS, id))
}

fn job_mut<'a>(
    jobs: &'a mut BTreeMap<u64, Job>,
    keys: &HashMap<String, u64>,
    id: &str,
) -> Result<&'a mut Job, ResourceError> {
    keys.get(id)
        .and_then(|seq| jobs.get_mut(seq))
        .ok_or_else(|| ResourceError::not_found(JOBS, id))
}

fn update_stored_gauge(state: &State) {
    metrics::gauge!(m::JOBS_STORED).set(state.jobs.len() as f64);
}
