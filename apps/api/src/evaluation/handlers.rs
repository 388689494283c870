//! Axum route handlers for evaluation, comparison, and cached results.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::evaluation::{comparison, evaluate_all, evaluate_one};
use crate::models::evaluation::{ComparisonResult, EvaluationResult, Recommendation, RoleLevel};
use crate::scoring::infer_role_level;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub job_id: String,
    pub job_title: String,
    pub role_level: RoleLevel,
    pub total_candidates: usize,
    pub evaluation_timestamp: DateTime<Utc>,
    pub candidates: Vec<EvaluationResult>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub job_id: String,
    pub candidate_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultsSummaryResponse {
    pub job_id: String,
    pub job_title: String,
    pub role_level: RoleLevel,
    pub total_candidates: usize,
    pub summary: FitSummary,
}

#[derive(Debug, Serialize)]
pub struct FitSummary {
    pub strong_fit_count: usize,
    pub moderate_fit_count: usize,
    pub weak_fit_count: usize,
    pub average_score: f64,
    pub highest_score: u32,
    pub lowest_score: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs/:job_id/evaluate
///
/// Evaluates every candidate registered for the job and returns them ranked
/// by final score.
pub async fn handle_evaluate_all(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let job = state
        .registry
        .get_job(&job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let candidates = evaluate_all(&state, &job_id).await?;

    Ok(Json(EvaluationResponse {
        job_id,
        job_title: job.title.clone(),
        role_level: infer_role_level(&job),
        total_candidates: candidates.len(),
        evaluation_timestamp: Utc::now(),
        candidates,
    }))
}

/// GET /api/v1/jobs/:job_id/candidates/:candidate_id/evaluate
pub async fn handle_evaluate_one(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Result<Json<EvaluationResult>, AppError> {
    let result = evaluate_one(&state, &job_id, &candidate_id).await?;
    Ok(Json(result))
}

/// POST /api/v1/compare
///
/// Ranks the given candidates against each other; errors with
/// INVALID_ARGUMENT for fewer than 2 ids.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ComparisonResult>, AppError> {
    let result = comparison::compare(&state, &request.job_id, &request.candidate_ids).await?;
    Ok(Json(result))
}

/// GET /api/v1/jobs/:job_id/results
///
/// Returns cached evaluations without recomputing; 404 when the job was
/// never evaluated.
pub async fn handle_get_results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let (job, results) = cached_results(&state, &job_id).await?;
    let latest = results
        .iter()
        .map(|r| r.evaluated_at)
        .max()
        .unwrap_or_else(Utc::now);

    Ok(Json(EvaluationResponse {
        job_id,
        job_title: job.title.clone(),
        role_level: infer_role_level(&job),
        total_candidates: results.len(),
        evaluation_timestamp: latest,
        candidates: results,
    }))
}

/// GET /api/v1/jobs/:job_id/results/summary
pub async fn handle_results_summary(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ResultsSummaryResponse>, AppError> {
    let (job, results) = cached_results(&state, &job_id).await?;

    let count = |r: Recommendation| {
        results
            .iter()
            .filter(|e| e.recommendation == r)
            .count()
    };
    let scores: Vec<u32> = results.iter().map(|e| e.scores.final_score).collect();
    let average = scores.iter().sum::<u32>() as f64 / scores.len() as f64;

    Ok(Json(ResultsSummaryResponse {
        job_id,
        job_title: job.title.clone(),
        role_level: infer_role_level(&job),
        total_candidates: results.len(),
        summary: FitSummary {
            strong_fit_count: count(Recommendation::StrongFit),
            moderate_fit_count: count(Recommendation::ModerateFit),
            weak_fit_count: count(Recommendation::WeakFit),
            average_score: (average * 100.0).round() / 100.0,
            highest_score: scores.iter().copied().max().unwrap_or(0),
            lowest_score: scores.iter().copied().min().unwrap_or(0),
        },
    }))
}

/// Loads the job and its cached evaluations sorted by final score; 404 when
/// either is missing.
async fn cached_results(
    state: &AppState,
    job_id: &str,
) -> Result<(crate::models::job::JobDescription, Vec<EvaluationResult>), AppError> {
    let job = state
        .registry
        .get_job(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let mut results = state.registry.list_evaluations(job_id).await;
    if results.is_empty() {
        return Err(AppError::NotFound(format!(
            "No cached results for job {job_id}. Run evaluation first."
        )));
    }
    results.sort_by(|a, b| {
        b.scores
            .final_score
            .cmp(&a.scores.final_score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });

    Ok((job, results))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::evaluation::test_support::*;

    #[tokio::test]
    async fn test_results_404_before_any_evaluation() {
        let state = test_state(Arc::new(FailingLlm));
        state.registry.upsert_job(job("JD-1", &["Python"])).await;

        let err = handle_get_results(State(state), Path("JD-1".to_string()))
            .await
            .err()
            .expect("expected 404");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_evaluate_all_then_results_are_served_from_cache() {
        let state = test_state(Arc::new(FailingLlm));
        state.registry.upsert_job(job("JD-1", &["Python"])).await;
        state
            .registry
            .upsert_profile("JD-1", profile("CAND-1", "Ada", &["Python"]))
            .await;

        let evaluated = handle_evaluate_all(State(state.clone()), Path("JD-1".to_string()))
            .await
            .unwrap();
        assert_eq!(evaluated.0.total_candidates, 1);

        let cached = handle_get_results(State(state), Path("JD-1".to_string()))
            .await
            .unwrap();
        assert_eq!(cached.0.candidates.len(), 1);
        assert_eq!(cached.0.candidates[0].candidate_id, "CAND-1");
    }

    #[tokio::test]
    async fn test_summary_buckets_and_stats() {
        let state = test_state(Arc::new(FailingLlm));
        state.registry.upsert_job(job("JD-1", &["Python"])).await;
        // CAND-1 matches everything (final 100 → Strong), CAND-2 nothing
        // (final 50 → Weak)
        state
            .registry
            .upsert_profile("JD-1", profile("CAND-1", "Ada", &["Python"]))
            .await;
        state
            .registry
            .upsert_profile("JD-1", profile("CAND-2", "Bob", &[]))
            .await;
        handle_evaluate_all(State(state.clone()), Path("JD-1".to_string()))
            .await
            .unwrap();

        let summary = handle_results_summary(State(state), Path("JD-1".to_string()))
            .await
            .unwrap();
        assert_eq!(summary.0.summary.strong_fit_count, 1);
        assert_eq!(summary.0.summary.weak_fit_count, 1);
        assert_eq!(summary.0.summary.highest_score, 100);
        assert_eq!(summary.0.summary.lowest_score, 50);
        assert!((summary.0.summary.average_score - 75.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_evaluate_all_unknown_job_404() {
        let state = test_state(Arc::new(FailingLlm));
        let err = handle_evaluate_all(State(state), Path("JD-404".to_string()))
            .await
            .err()
            .expect("expected 404");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
