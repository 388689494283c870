//! Job CRUD handlers — thin plumbing over the registry.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::job::JobDescription;
use crate::state::AppState;

/// Shared ack payload for create/update/delete and resume ingestion.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

fn validate(job: &JobDescription) -> Result<(), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::InvalidArgument("job title cannot be empty".to_string()));
    }
    if job.description.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "job description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/jobs
///
/// Registers a job description; an id is generated when the caller does not
/// supply one.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(mut job): Json<JobDescription>,
) -> Result<Json<UploadResponse>, AppError> {
    validate(&job)?;

    if job.id.trim().is_empty() {
        job.id = JobDescription::generate_id();
    }
    let job_id = job.id.clone();

    state.registry.upsert_job(job).await;
    info!(%job_id, "job created");

    Ok(Json(UploadResponse {
        success: true,
        message: "Job description created successfully".to_string(),
        job_id: Some(job_id),
        count: None,
    }))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobDescription>, AppError> {
    let job = state
        .registry
        .get_job(&job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<JobDescription>> {
    Json(state.registry.list_jobs().await)
}

/// PUT /api/v1/jobs/:job_id
///
/// Upserts the job under the path id and invalidates cached evaluations —
/// changed requirements make them stale.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(mut job): Json<JobDescription>,
) -> Result<Json<UploadResponse>, AppError> {
    validate(&job)?;

    job.id = job_id.clone();
    state.registry.upsert_job(job).await;
    state.registry.clear_evaluations(&job_id).await;
    info!(%job_id, "job updated, evaluation cache cleared");

    Ok(Json(UploadResponse {
        success: true,
        message: "Job description updated successfully".to_string(),
        job_id: Some(job_id),
        count: None,
    }))
}

/// DELETE /api/v1/jobs/:job_id
///
/// Removes the job with its profiles, cached evaluations, and indexed
/// resume chunks.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<UploadResponse>, AppError> {
    if !state.registry.remove_job(&job_id).await {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    state.retrieval.drop_job(&job_id).await;
    info!(%job_id, "job deleted");

    Ok(Json(UploadResponse {
        success: true,
        message: "Job and associated data deleted successfully".to_string(),
        job_id: Some(job_id),
        count: None,
    }))
}
