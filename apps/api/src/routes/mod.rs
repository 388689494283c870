pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::evaluation::handlers as evaluation_handlers;
use crate::extract;
use crate::jobs;
use crate::resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/api/v1/jobs", post(jobs::handle_create_job))
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/:job_id", get(jobs::handle_get_job))
        .route("/api/v1/jobs/:job_id", put(jobs::handle_update_job))
        .route("/api/v1/jobs/:job_id", delete(jobs::handle_delete_job))
        // PDF extraction
        .route("/api/v1/extract", post(extract::handle_extract))
        // Resumes & candidates
        .route(
            "/api/v1/jobs/:job_id/resumes",
            post(resumes::handle_upload_resume),
        )
        .route(
            "/api/v1/jobs/:job_id/resumes/bulk",
            post(resumes::handle_bulk_upload),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates",
            get(resumes::handle_list_candidates),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id",
            get(resumes::handle_candidate_detail),
        )
        // Evaluation & comparison
        .route(
            "/api/v1/jobs/:job_id/evaluate",
            get(evaluation_handlers::handle_evaluate_all),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id/evaluate",
            get(evaluation_handlers::handle_evaluate_one),
        )
        .route("/api/v1/compare", post(evaluation_handlers::handle_compare))
        // Cached results
        .route(
            "/api/v1/jobs/:job_id/results",
            get(evaluation_handlers::handle_get_results),
        )
        .route(
            "/api/v1/jobs/:job_id/results/summary",
            get(evaluation_handlers::handle_results_summary),
        )
        .with_state(state)
}
