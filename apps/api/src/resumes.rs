//! Resume ingestion and candidate lookup handlers.
//!
//! Ingestion parses the resume into a profile and indexes its text for
//! retrieval. Parsing never rejects a resume; indexing failures degrade to
//! zero chunks. Re-uploading a candidate overwrites profile and chunks.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::UploadResponse;
use crate::matching::match_skills;
use crate::models::candidate::CandidateProfile;
use crate::parsing;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeUpload {
    #[serde(default)]
    pub candidate_id: String,
    pub candidate_name: String,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkResumeUpload {
    pub resumes: Vec<ResumeUpload>,
}

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub job_id: String,
    pub total_candidates: usize,
    pub candidates: Vec<CandidateSummary>,
}

#[derive(Debug, Serialize)]
pub struct CandidateSummary {
    pub candidate_id: String,
    pub candidate_name: String,
}

/// Profile plus its skill match against the job's requirements.
#[derive(Debug, Serialize)]
pub struct CandidateDetailResponse {
    pub candidate_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<u32>,
    pub experience_summary: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_percentage: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:job_id/resumes
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(upload): Json<ResumeUpload>,
) -> Result<Json<UploadResponse>, AppError> {
    require_job(&state, &job_id).await?;
    let (candidate_id, chunks) = ingest(&state, &job_id, upload).await?;
    state.registry.clear_evaluations(&job_id).await;

    Ok(Json(UploadResponse {
        success: true,
        message: format!("Resume indexed successfully with {chunks} chunks"),
        job_id: Some(job_id),
        count: Some(chunks),
    }))
}

/// POST /api/v1/jobs/:job_id/resumes/bulk
pub async fn handle_bulk_upload(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(bulk): Json<BulkResumeUpload>,
) -> Result<Json<UploadResponse>, AppError> {
    require_job(&state, &job_id).await?;

    if bulk.resumes.is_empty() {
        return Err(AppError::InvalidArgument("no resumes supplied".to_string()));
    }
    if bulk.resumes.len() > state.config.max_resumes_per_job {
        return Err(AppError::InvalidArgument(format!(
            "maximum {} resumes allowed per request",
            state.config.max_resumes_per_job
        )));
    }

    let mut processed = 0usize;
    let mut total_chunks = 0usize;
    for upload in bulk.resumes {
        let (_, chunks) = ingest(&state, &job_id, upload).await?;
        processed += 1;
        total_chunks += chunks;
    }
    state.registry.clear_evaluations(&job_id).await;

    info!(%job_id, processed, total_chunks, "bulk resume ingest complete");

    Ok(Json(UploadResponse {
        success: true,
        message: format!("Successfully indexed {processed} resumes with {total_chunks} chunks"),
        job_id: Some(job_id),
        count: Some(processed),
    }))
}

/// GET /api/v1/jobs/:job_id/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<CandidateListResponse>, AppError> {
    require_job(&state, &job_id).await?;

    let candidates: Vec<CandidateSummary> = state
        .registry
        .list_profiles(&job_id)
        .await
        .into_iter()
        .map(|p| CandidateSummary {
            candidate_id: p.candidate_id,
            candidate_name: p.name,
        })
        .collect();

    Ok(Json(CandidateListResponse {
        job_id,
        total_candidates: candidates.len(),
        candidates,
    }))
}

/// GET /api/v1/jobs/:job_id/candidates/:candidate_id
///
/// The profile with its matched/missing skills and match percentage against
/// the job's requirements.
pub async fn handle_candidate_detail(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Result<Json<CandidateDetailResponse>, AppError> {
    let job = state
        .registry
        .get_job(&job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let profile = state
        .registry
        .get_profile(&job_id, &candidate_id)
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidate {candidate_id} not found for job {job_id}"))
        })?;

    let skill_match = match_skills(
        &profile.skills,
        &job.mandatory_skills,
        &job.optional_skills,
    );

    Ok(Json(CandidateDetailResponse {
        candidate_id: profile.candidate_id,
        name: profile.name,
        email: profile.email,
        phone: profile.phone,
        experience_years: profile.experience_years,
        experience_summary: profile.experience_summary,
        skills: profile.skills,
        education: profile.education,
        matched_skills: skill_match.all_matched(),
        missing_skills: skill_match.missing_skills.clone(),
        match_percentage: skill_match.match_percentage,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Ingestion
// ────────────────────────────────────────────────────────────────────────────

async fn require_job(state: &AppState, job_id: &str) -> Result<(), AppError> {
    state
        .registry
        .get_job(job_id)
        .await
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// Parses and stores one resume, then indexes it for retrieval. Returns the
/// candidate id and the number of indexed chunks.
async fn ingest(
    state: &AppState,
    job_id: &str,
    upload: ResumeUpload,
) -> Result<(String, usize), AppError> {
    if upload.candidate_name.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "candidate_name cannot be empty".to_string(),
        ));
    }
    if upload.resume_text.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let candidate_id = if upload.candidate_id.trim().is_empty() {
        CandidateProfile::generate_id()
    } else {
        upload.candidate_id.clone()
    };

    let vocabulary = state.registry.known_skills().await;
    let profile = parsing::parse(
        &candidate_id,
        &upload.candidate_name,
        &upload.resume_text,
        &vocabulary,
    );
    state.registry.upsert_profile(job_id, profile).await;

    let chunks = state
        .retrieval
        .index_resume(job_id, &candidate_id, &upload.resume_text)
        .await;

    info!(job_id, %candidate_id, chunks, "resume ingested");
    Ok((candidate_id, chunks))
}
