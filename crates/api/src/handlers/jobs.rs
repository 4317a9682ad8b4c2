//! 잡, 액티비티, 테스트 결과 핸들러

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use testrack_core::page::Page;
use testrack_core::types::{Activity, ActivitySpec, Job, JobSpec, TestResult, TestSpec};

use super::parse_id;
use crate::error::ApiError;
use crate::pagination::Paging;
use crate::payload::Payload;
use crate::state::AppState;

/// `GET /jobs/`
pub async fn list(
    State(state): State<AppState>,
    paging: Paging,
) -> Result<Json<Page<Job>>, ApiError> {
    let jobs = state.jobs.list_jobs().await;
    Ok(Json(paging.paginate(jobs)?))
}

/// `POST /jobs/`
pub async fn create(
    State(state): State<AppState>,
    payload: Payload<JobSpec>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let job = state.jobs.create_job(payload.into_inner()).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// `GET /jobs/{id}/`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.jobs.get_job(&id).await?))
}

/// `DELETE /jobs/{id}/`: 액티비티와 테스트 결과까지 삭제
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.jobs.delete_job(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Activities ──────────────────────────────────────────────────────

/// `GET /jobs/{id}/activities/`
pub async fn list_activities(
    State(state): State<AppState>,
    Path(id): Path<String>,
    paging: Paging,
) -> Result<Json<Page<Activity>>, ApiError> {
    let activities = state.jobs.list_activities(&id).await?;
    Ok(Json(paging.paginate(activities)?))
}

/// `POST /jobs/{id}/activities/`
pub async fn add_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Payload<ActivitySpec>,
) -> Result<(StatusCode, Json<Activity>), ApiError> {
    let activity = state.jobs.add_activity(&id, payload.into_inner()).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

/// `DELETE /jobs/{id}/activities/{activity_id}/`
pub async fn remove_activity(
    State(state): State<AppState>,
    Path((id, raw)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let activity_id = parse_id("activities", &raw)?;
    state.jobs.remove_activity(&id, activity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Tests ───────────────────────────────────────────────────────────

/// `GET /jobs/{id}/tests/`
pub async fn list_tests(
    State(state): State<AppState>,
    Path(id): Path<String>,
    paging: Paging,
) -> Result<Json<Page<TestResult>>, ApiError> {
    let tests = state.jobs.list_tests(&id).await?;
    Ok(Json(paging.paginate(tests)?))
}

/// `POST /jobs/{id}/tests/`
pub async fn add_test(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Payload<TestSpec>,
) -> Result<(StatusCode, Json<TestResult>), ApiError> {
    let test = state.jobs.add_test(&id, payload.into_inner()).await?;
    Ok((StatusCode::CREATED, Json(test)))
}

/// `DELETE /jobs/{id}/tests/{test_id}/`
pub async fn remove_test(
    State(state): State<AppState>,
    Path((id, raw)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let test_id = parse_id("tests", &raw)?;
    state.jobs.remove_test(&id, test_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
