//! Multi-candidate comparison — pooled LLM ranking with a deterministic
//! fallback.
//!
//! The model's ranking is only trusted when it enumerates exactly the input
//! candidate set. Omissions, duplicates, strangers, parse failures, and
//! upstream failures all discard the model output and fall back to ranking
//! by final score (descending, candidate id as tiebreak), so the invariant
//! `ranking.len() == candidates.len()` holds unconditionally.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::evaluate_profile;
use crate::evaluation::prompts::{COMPARISON_PROMPT_TEMPLATE, COMPARISON_SYSTEM};
use crate::llm_client::strip_json_fences;
use crate::models::evaluation::{ComparisonResult, EvaluationResult, RankedCandidate};
use crate::state::AppState;

/// Resume text included per candidate in the pooled prompt.
const RESUME_EXCERPT_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
struct WireComparison {
    #[serde(default)]
    ranking: Vec<WireRankedCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireRankedCandidate {
    candidate_name: String,
    #[serde(default)]
    match_score: f64,
    #[serde(default)]
    key_advantages: Vec<String>,
    #[serde(default)]
    key_gaps: Vec<String>,
}

/// Compares at least two candidates for one job.
pub async fn compare(
    state: &AppState,
    job_id: &str,
    candidate_ids: &[String],
) -> Result<ComparisonResult, AppError> {
    if candidate_ids.len() < 2 {
        return Err(AppError::InvalidArgument(
            "at least 2 candidate ids are required for comparison".to_string(),
        ));
    }

    let mut distinct = Vec::new();
    for id in candidate_ids {
        if !distinct.contains(id) {
            distinct.push(id.clone());
        }
    }
    if distinct.len() < 2 {
        return Err(AppError::InvalidArgument(
            "comparison requires at least 2 distinct candidate ids".to_string(),
        ));
    }

    let job = state
        .registry
        .get_job(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    // Cached evaluations are reused; missing ones are computed fresh (and
    // cached as a side effect).
    let mut evaluations: Vec<EvaluationResult> = Vec::with_capacity(distinct.len());
    for candidate_id in &distinct {
        let profile = state
            .registry
            .get_profile(job_id, candidate_id)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Candidate {candidate_id} not found for job {job_id}"
                ))
            })?;

        let evaluation = match state.registry.get_evaluation(job_id, candidate_id).await {
            Some(cached) => cached,
            None => evaluate_profile(state, &job, profile).await,
        };
        evaluations.push(evaluation);
    }

    let ranking = match rank_with_model(state, &job.prompt_text(), job_id, &evaluations).await {
        Some(ranking) => ranking,
        None => {
            info!(job_id, "using deterministic fallback ranking");
            fallback_ranking(&evaluations)
        }
    };

    let best_candidate = ranking[0].candidate_name.clone();

    Ok(ComparisonResult {
        job_id: job_id.to_string(),
        ranking,
        best_candidate,
    })
}

/// Asks the model for a ranking and validates it against the candidate set.
/// Any defect returns `None` and the caller falls back.
async fn rank_with_model(
    state: &AppState,
    jd_text: &str,
    job_id: &str,
    evaluations: &[EvaluationResult],
) -> Option<Vec<RankedCandidate>> {
    let expected: Vec<String> = evaluations
        .iter()
        .map(|e| normalize_name(&e.candidate_name))
        .collect();
    let unique: HashSet<&String> = expected.iter().collect();
    if unique.len() != expected.len() {
        // Two candidates share a display name; the model's ranking cannot
        // be validated against the input set.
        warn!(job_id, "duplicate candidate names, model ranking unusable");
        return None;
    }

    let mut blocks = Vec::with_capacity(evaluations.len());
    for e in evaluations {
        let raw_text = state
            .registry
            .get_profile(job_id, &e.candidate_id)
            .await
            .map(|p| excerpt(&p.raw_text))
            .unwrap_or_default();
        blocks.push(format!(
            "CANDIDATE: {}\nFINAL SCORE: {}/100\nMATCHED SKILLS: {}\nMISSING SKILLS: {}\nRESUME:\n{}",
            e.candidate_name,
            e.scores.final_score,
            e.matched_skills.join(", "),
            e.missing_skills.join(", "),
            raw_text,
        ));
    }

    let prompt = COMPARISON_PROMPT_TEMPLATE
        .replace("{job_id}", job_id)
        .replace("{jd_text}", jd_text)
        .replace("{candidates}", &blocks.join("\n\n"));

    let raw = match state.llm.complete(COMPARISON_SYSTEM, &prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(job_id, error = %e, "comparison LLM call failed");
            return None;
        }
    };

    let wire: WireComparison = match serde_json::from_str(strip_json_fences(&raw)) {
        Ok(wire) => wire,
        Err(e) => {
            warn!(job_id, error = %e, "unparseable comparison response");
            return None;
        }
    };

    // The ranking must enumerate exactly the input candidate set
    let mut seen: HashSet<String> = HashSet::new();
    for entry in &wire.ranking {
        let name = normalize_name(&entry.candidate_name);
        if !expected.contains(&name) || !seen.insert(name) {
            warn!(
                job_id,
                name = %entry.candidate_name,
                "model ranking names an unknown or duplicate candidate"
            );
            return None;
        }
    }
    if seen.len() != expected.len() {
        warn!(
            job_id,
            returned = seen.len(),
            expected = expected.len(),
            "model ranking omitted candidates"
        );
        return None;
    }

    Some(
        wire.ranking
            .into_iter()
            .map(|entry| RankedCandidate {
                candidate_name: entry.candidate_name,
                match_score: entry.match_score.round().clamp(0.0, 100.0) as u32,
                key_advantages: entry.key_advantages,
                key_gaps: entry.key_gaps,
            })
            .collect(),
    )
}

/// Deterministic ranking: final score descending, candidate id ascending on
/// ties; advantages/gaps come straight from matched/missing skills.
fn fallback_ranking(evaluations: &[EvaluationResult]) -> Vec<RankedCandidate> {
    let mut sorted: Vec<&EvaluationResult> = evaluations.iter().collect();
    sorted.sort_by(|a, b| {
        b.scores
            .final_score
            .cmp(&a.scores.final_score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });

    sorted
        .into_iter()
        .map(|e| RankedCandidate {
            candidate_name: e.candidate_name.clone(),
            match_score: e.scores.final_score,
            key_advantages: e.matched_skills.clone(),
            key_gaps: e.missing_skills.clone(),
        })
        .collect()
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn excerpt(text: &str) -> String {
    text.chars().take(RESUME_EXCERPT_CHARS).collect()
}
