//! Evaluation orchestration — composes matching, scoring, retrieval, and
//! the LLM into `EvaluationResult`s.
//!
//! Flow per candidate: skill match → deterministic scores → retrieval
//! context → evaluation prompt → LLM (retry once) → defensive parse →
//! merge → cache. The deterministic half always succeeds; the LLM half
//! degrades to heuristic-only output, it never fails an evaluation.

pub mod comparison;
pub mod handlers;
pub mod prompts;
pub mod response;

use anyhow::anyhow;
use chrono::Utc;
use futures::{stream, StreamExt};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::matching::{match_skills, SkillMatch};
use crate::models::candidate::CandidateProfile;
use crate::models::evaluation::{EvaluationResult, Recommendation, ScoreBreakdown};
use crate::models::job::JobDescription;
use crate::scoring::{recommendation_for, score};
use crate::state::AppState;

use prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};
use response::{parse_assessment, AssessmentOutcome};

/// Candidates evaluated concurrently in `evaluate_all`. Each holds one
/// in-flight LLM call, so this also bounds upstream pressure.
const EVAL_CONCURRENCY: usize = 4;

const DEGRADED_NOTE: &str =
    "AI commentary unavailable after retry; scores and recommendation are heuristic-only.";
const MALFORMED_NOTE: &str =
    "AI response could not be parsed; scores and recommendation are heuristic-only.";

/// Evaluates one candidate, overwriting any cached result.
pub async fn evaluate_one(
    state: &AppState,
    job_id: &str,
    candidate_id: &str,
) -> Result<EvaluationResult, AppError> {
    let job = state
        .registry
        .get_job(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let profile = state
        .registry
        .get_profile(job_id, candidate_id)
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidate {candidate_id} not found for job {job_id}"))
        })?;

    Ok(evaluate_profile(state, &job, profile).await)
}

/// Evaluates every registered candidate for a job with bounded concurrency.
/// One candidate's upstream failure degrades only that candidate's result.
/// Results are sorted by final score descending (candidate id as tiebreak).
pub async fn evaluate_all(
    state: &AppState,
    job_id: &str,
) -> Result<Vec<EvaluationResult>, AppError> {
    let job = state
        .registry
        .get_job(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let mut profiles = state.registry.list_profiles(job_id).await;
    profiles.truncate(state.config.max_resumes_per_job);

    info!(job_id, candidates = profiles.len(), "starting evaluation");

    let mut results: Vec<EvaluationResult> = stream::iter(profiles)
        .map(|profile| evaluate_profile(state, &job, profile))
        .buffer_unordered(EVAL_CONCURRENCY)
        .collect()
        .await;

    results.sort_by(|a, b| {
        b.scores
            .final_score
            .cmp(&a.scores.final_score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });

    Ok(results)
}

/// The single-candidate pipeline. Infallible: whatever the LLM does, a
/// result comes back and is cached.
pub(crate) async fn evaluate_profile(
    state: &AppState,
    job: &JobDescription,
    profile: CandidateProfile,
) -> EvaluationResult {
    let skill_match = match_skills(
        &profile.skills,
        &job.mandatory_skills,
        &job.optional_skills,
    );
    let scores = score(&profile, job, &skill_match, &state.config.scoring);

    let jd_text = job.prompt_text();
    let context = state
        .retrieval
        .candidate_context(&job.id, &profile.candidate_id, &jd_text)
        .await;

    let result = match build_evaluation_prompt(&jd_text, job, &profile, &context, &scores) {
        Ok(prompt) => match state.llm.complete(EVALUATION_SYSTEM, &prompt).await {
            Ok(raw) => match parse_assessment(&raw) {
                AssessmentOutcome::Parsed(assessment) => {
                    merge(state, job, &profile, &skill_match, scores, assessment)
                }
                AssessmentOutcome::Malformed(raw) => {
                    warn!(
                        job_id = %job.id,
                        candidate_id = %profile.candidate_id,
                        response_len = raw.len(),
                        "unparseable LLM response, using heuristic result"
                    );
                    heuristic_result(state, job, &profile, &skill_match, scores, MALFORMED_NOTE)
                }
            },
            Err(e) => {
                warn!(
                    job_id = %job.id,
                    candidate_id = %profile.candidate_id,
                    error = %e,
                    "LLM unavailable, using heuristic result"
                );
                heuristic_result(state, job, &profile, &skill_match, scores, DEGRADED_NOTE)
            }
        },
        Err(e) => {
            warn!(job_id = %job.id, error = %e, "failed to build evaluation prompt");
            heuristic_result(state, job, &profile, &skill_match, scores, MALFORMED_NOTE)
        }
    };

    state.registry.store_evaluation(result.clone()).await;
    result
}

/// Merges model commentary with the deterministic half. A well-formed model
/// recommendation label wins; otherwise the threshold rule is authoritative.
fn merge(
    state: &AppState,
    job: &JobDescription,
    profile: &CandidateProfile,
    skill_match: &SkillMatch,
    scores: ScoreBreakdown,
    assessment: response::Assessment,
) -> EvaluationResult {
    let recommendation = assessment
        .recommendation
        .as_deref()
        .and_then(Recommendation::from_label)
        .unwrap_or_else(|| recommendation_for(scores.final_score, &state.config.scoring));

    let summary = if assessment.summary.trim().is_empty() {
        heuristic_summary(skill_match, &scores)
    } else {
        assessment.summary
    };

    EvaluationResult {
        job_id: job.id.clone(),
        candidate_id: profile.candidate_id.clone(),
        candidate_name: profile.name.clone(),
        scores,
        matched_skills: skill_match.all_matched(),
        missing_skills: skill_match.missing_skills.clone(),
        strengths: assessment.strengths,
        weaknesses: assessment.weaknesses,
        summary,
        recommendation,
        confidence_note: assessment
            .confidence_note
            .unwrap_or_else(|| "Based on resume evidence and heuristic scores.".to_string()),
        evaluated_at: Utc::now(),
    }
}

/// Result built from the score breakdown alone, with the recommendation
/// derived from the threshold rule.
fn heuristic_result(
    state: &AppState,
    job: &JobDescription,
    profile: &CandidateProfile,
    skill_match: &SkillMatch,
    scores: ScoreBreakdown,
    note: &str,
) -> EvaluationResult {
    EvaluationResult {
        job_id: job.id.clone(),
        candidate_id: profile.candidate_id.clone(),
        candidate_name: profile.name.clone(),
        scores,
        matched_skills: skill_match.all_matched(),
        missing_skills: skill_match.missing_skills.clone(),
        strengths: vec![],
        weaknesses: vec![],
        summary: heuristic_summary(skill_match, &scores),
        recommendation: recommendation_for(scores.final_score, &state.config.scoring),
        confidence_note: note.to_string(),
        evaluated_at: Utc::now(),
    }
}

fn heuristic_summary(skill_match: &SkillMatch, scores: &ScoreBreakdown) -> String {
    let mandatory_total = skill_match.matched_mandatory.len() + skill_match.missing_skills.len();
    format!(
        "Matched {} of {} mandatory skills; final score {}/100.",
        skill_match.matched_mandatory.len(),
        mandatory_total,
        scores.final_score
    )
}

fn build_evaluation_prompt(
    jd_text: &str,
    job: &JobDescription,
    profile: &CandidateProfile,
    context: &str,
    scores: &ScoreBreakdown,
) -> anyhow::Result<String> {
    let profile_json = serde_json::to_string_pretty(&serde_json::json!({
        "name": profile.name,
        "skills": profile.skills,
        "experience_years": profile.experience_years,
        "experience_summary": profile.experience_summary,
        "education": profile.education,
    }))
    .map_err(|e| anyhow!("Failed to serialize profile: {e}"))?;

    let scores_json =
        serde_json::to_string(scores).map_err(|e| anyhow!("Failed to serialize scores: {e}"))?;
    let mandatory = serde_json::to_string(&job.mandatory_skills)
        .map_err(|e| anyhow!("Failed to serialize skills: {e}"))?;
    let optional = serde_json::to_string(&job.optional_skills)
        .map_err(|e| anyhow!("Failed to serialize skills: {e}"))?;

    let context = if context.trim().is_empty() {
        "(no resume excerpts retrieved)"
    } else {
        context
    };

    Ok(EVALUATION_PROMPT_TEMPLATE
        .replace("{jd_text}", jd_text)
        .replace("{mandatory_skills}", &mandatory)
        .replace("{optional_skills}", &optional)
        .replace("{profile_json}", &profile_json)
        .replace("{context}", context)
        .replace("{scores_json}", &scores_json))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::config::Config;
    use crate::llm_client::{CompletionBackend, LlmError, RetryPolicy};
    use crate::models::candidate::CandidateProfile;
    use crate::models::job::JobDescription;
    use crate::registry::InMemoryRegistry;
    use crate::retrieval::vector_store::InMemoryVectorIndex;
    use crate::retrieval::RetrievalContextBuilder;
    use crate::retrieval::chunker::TextChunker;
    use crate::scoring::ScoringPolicy;
    use crate::state::AppState;

    /// Backend returning one canned response for every call.
    pub struct CannedLlm(pub String);

    #[async_trait]
    impl CompletionBackend for CannedLlm {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    /// Backend that always fails, as after an exhausted retry budget.
    pub struct FailingLlm;

    #[async_trait]
    impl CompletionBackend for FailingLlm {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Exhausted { attempts: 2 })
        }
    }

    pub fn test_config() -> Config {
        Config {
            llm_api_key: "test-key".to_string(),
            llm_base_url: "http://localhost:0".to_string(),
            llm_model: "test-model".to_string(),
            retry: RetryPolicy {
                max_attempts: 2,
                timeout: Duration::from_secs(1),
            },
            scoring: ScoringPolicy::default(),
            top_k_chunks: 5,
            chunk_size: 500,
            chunk_overlap: 50,
            max_resumes_per_job: 50,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    pub fn test_state(llm: Arc<dyn CompletionBackend>) -> AppState {
        AppState {
            registry: Arc::new(InMemoryRegistry::new()),
            llm,
            retrieval: RetrievalContextBuilder::new(
                InMemoryVectorIndex::new(),
                TextChunker::default(),
                5,
            ),
            config: test_config(),
        }
    }

    pub fn job(id: &str, mandatory: &[&str]) -> JobDescription {
        JobDescription {
            id: id.to_string(),
            title: "Senior Python Developer".to_string(),
            description: "Backend services in Python.".to_string(),
            mandatory_skills: mandatory.iter().map(|s| s.to_string()).collect(),
            optional_skills: vec![],
            min_experience_years: None,
            education_requirements: None,
        }
    }

    pub fn profile(id: &str, name: &str, skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            candidate_id: id.to_string(),
            name: name.to_string(),
            email: None,
            phone: None,
            experience_years: Some(5),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            education: vec![],
            experience_summary: "Backend work.".to_string(),
            raw_text: "Backend engineer resume text.".to_string(),
        }
    }
}
