//! Skill matching — candidate skills against a job's mandatory/optional
//! requirement sets.
//!
//! Comparison is case-insensitive with punctuation and whitespace folded
//! out, after synonym normalization, and a job skill also counts as matched
//! when it appears as a substring of a candidate skill or vice versa
//! ("REST APIs" covers "REST API").

use serde::{Deserialize, Serialize};

use crate::parsing::vocabulary::normalize_skill;

/// Outcome of matching one candidate against one job's skill requirements.
///
/// Invariants: `matched_mandatory` and `missing_skills` are disjoint and
/// together cover the job's mandatory set; `match_percentage` only counts
/// mandatory skills — optional matches are surfaced separately for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched_mandatory: Vec<String>,
    pub matched_optional: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_percentage: u32,
}

impl SkillMatch {
    /// Every matched skill, mandatory first, for result payloads.
    pub fn all_matched(&self) -> Vec<String> {
        let mut all = self.matched_mandatory.clone();
        all.extend(self.matched_optional.iter().cloned());
        all
    }
}

/// Folds a skill down to its comparable form: synonym-normalized, lowercase,
/// alphanumerics only.
fn fold(skill: &str) -> String {
    normalize_skill(skill)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn is_match(job_folded: &str, candidate_folded: &str) -> bool {
    !job_folded.is_empty()
        && !candidate_folded.is_empty()
        && (candidate_folded.contains(job_folded) || job_folded.contains(candidate_folded))
}

/// Matches candidate skills against the job's requirement sets.
///
/// `match_percentage` is `round(100 · |matched mandatory| / |mandatory|)`,
/// defined as 100 when the job lists no mandatory skills (no requirement
/// means full credit).
pub fn match_skills(
    candidate_skills: &[String],
    mandatory_skills: &[String],
    optional_skills: &[String],
) -> SkillMatch {
    let candidate_folded: Vec<String> = candidate_skills.iter().map(|s| fold(s)).collect();

    let mut matched_mandatory = Vec::new();
    let mut missing_skills = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for job_skill in mandatory_skills {
        let folded = fold(job_skill);
        if !seen.insert(folded.clone()) {
            continue; // duplicate requirement
        }
        if candidate_folded.iter().any(|c| is_match(&folded, c)) {
            matched_mandatory.push(job_skill.clone());
        } else {
            missing_skills.push(job_skill.clone());
        }
    }

    let mandatory_total = matched_mandatory.len() + missing_skills.len();
    let match_percentage = if mandatory_total == 0 {
        100
    } else {
        ((matched_mandatory.len() as f64 / mandatory_total as f64) * 100.0).round() as u32
    };

    let mut matched_optional = Vec::new();
    let mut seen_optional = std::collections::HashSet::new();
    for job_skill in optional_skills {
        let folded = fold(job_skill);
        if seen.contains(&folded) || !seen_optional.insert(folded.clone()) {
            continue;
        }
        if candidate_folded.iter().any(|c| is_match(&folded, c)) {
            matched_optional.push(job_skill.clone());
        }
    }

    SkillMatch {
        matched_mandatory,
        matched_optional,
        missing_skills,
        match_percentage,
    }
}
