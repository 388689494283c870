use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sub-scores and weighted final score, each an integer in [0,100].
///
/// `final_score` is the weighted sum of the three sub-scores, rounded and
/// clamped; the weights live in `Config` (reference 0.5/0.3/0.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills_score: u32,
    pub experience_score: u32,
    pub education_score: u32,
    pub final_score: u32,
}

/// Fit recommendation for a candidate. Serialized with the human labels the
/// UI and the LLM prompts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Fit")]
    StrongFit,
    #[serde(rename = "Moderate Fit")]
    ModerateFit,
    #[serde(rename = "Weak Fit")]
    WeakFit,
}

impl Recommendation {
    /// Lenient label matcher for model-provided recommendations.
    /// Anything unrecognizable returns `None` and the caller falls back to
    /// the score-threshold rule.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower.starts_with("strong") {
            Some(Recommendation::StrongFit)
        } else if lower.starts_with("moderate") || lower.starts_with("partial") {
            Some(Recommendation::ModerateFit)
        } else if lower.starts_with("weak") {
            Some(Recommendation::WeakFit)
        } else {
            None
        }
    }
}

/// Role level inferred from the job description. Drives no scoring; surfaced
/// on evaluation responses so reviewers see what seniority the JD implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleLevel {
    Intern,
    Junior,
    Mid,
    Senior,
    Lead,
}

/// Full evaluation of one candidate against one job.
///
/// Keyed by `(job_id, candidate_id)` in the registry cache; recomputed and
/// overwritten on every evaluate call. When the LLM was unavailable the
/// qualitative fields are empty/heuristic and `confidence_note` says so.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub job_id: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub scores: ScoreBreakdown,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary: String,
    pub recommendation: Recommendation,
    pub confidence_note: String,
    pub evaluated_at: DateTime<Utc>,
}

/// One entry of a comparison ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate_name: String,
    pub match_score: u32,
    pub key_advantages: Vec<String>,
    pub key_gaps: Vec<String>,
}

/// Ranked comparison of N candidates for one job.
/// Invariant: `ranking.len()` equals the number of compared candidates and
/// `best_candidate` names `ranking[0]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub job_id: String,
    pub ranking: Vec<RankedCandidate>,
    pub best_candidate: String,
}
