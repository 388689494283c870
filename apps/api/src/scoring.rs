//! Deterministic scoring — skill/experience/education sub-scores, the
//! weighted composite, the score-threshold recommendation rule, and
//! role-level inference from the JD.
//!
//! Everything here is a pure function of its inputs: repeated calls with the
//! same profile, job, and match result return bit-identical breakdowns.

use std::collections::HashSet;

use serde::Deserialize;

use crate::matching::SkillMatch;
use crate::models::candidate::CandidateProfile;
use crate::models::evaluation::{Recommendation, RoleLevel, ScoreBreakdown};
use crate::models::job::JobDescription;
use crate::parsing::contains_token;

/// Scoring weights and recommendation thresholds.
///
/// Policy knobs, not truths: the defaults mirror the product's reference
/// semantics (0.5/0.3/0.2, Strong ≥ 80, Moderate ≥ 55) and are overridable
/// through `Config`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringPolicy {
    pub skills_weight: f64,
    pub experience_weight: f64,
    pub education_weight: f64,
    pub strong_fit_threshold: u32,
    pub moderate_fit_threshold: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            skills_weight: 0.5,
            experience_weight: 0.3,
            education_weight: 0.2,
            strong_fit_threshold: 80,
            moderate_fit_threshold: 55,
        }
    }
}

/// Computes the full score breakdown for one candidate against one job.
pub fn score(
    profile: &CandidateProfile,
    job: &JobDescription,
    skill_match: &SkillMatch,
    policy: &ScoringPolicy,
) -> ScoreBreakdown {
    let skills_score = skill_match.match_percentage.min(100);
    let experience_score = experience_score(job.min_experience_years, profile.experience_years);
    let education_score =
        education_score(&profile.education, job.education_requirements.as_deref());

    let weighted = policy.skills_weight * skills_score as f64
        + policy.experience_weight * experience_score as f64
        + policy.education_weight * education_score as f64;
    let final_score = (weighted.round() as i64).clamp(0, 100) as u32;

    ScoreBreakdown {
        skills_score,
        experience_score,
        education_score,
        final_score,
    }
}

/// The deterministic recommendation rule applied when the model supplies no
/// usable label.
pub fn recommendation_for(final_score: u32, policy: &ScoringPolicy) -> Recommendation {
    if final_score >= policy.strong_fit_threshold {
        Recommendation::StrongFit
    } else if final_score >= policy.moderate_fit_threshold {
        Recommendation::ModerateFit
    } else {
        Recommendation::WeakFit
    }
}

/// No stated minimum means the requirement is vacuously satisfied; a stated
/// minimum with unverifiable candidate experience scores 0 (conservative);
/// otherwise linear up to the minimum, capped at 100.
fn experience_score(required: Option<u32>, candidate: Option<u32>) -> u32 {
    match required {
        None | Some(0) => 100,
        Some(min) => match candidate {
            None => 0,
            Some(years) => (((years as f64 / min as f64).min(1.0)) * 100.0).round() as u32,
        },
    }
}

const EDUCATION_STOPWORDS: &[&str] = &[
    "degree", "field", "related", "required", "preferred", "equivalent",
    "with", "from", "and", "the",
];

/// Reduces free text to canonical comparison tokens: lowercase alphanumeric
/// words of three or more characters, with degree spellings collapsed to
/// their family ("b.tech" and "bachelors" both become "bachelor").
fn education_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter_map(|word| {
            let token: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            let token = degree_family(&token);
            (token.len() >= 3 && !EDUCATION_STOPWORDS.contains(&token.as_str()))
                .then_some(token)
        })
        .collect()
}

fn degree_family(token: &str) -> String {
    match token {
        t if t.starts_with("bachelor") => "bachelor".to_string(),
        "bs" | "bsc" | "btech" | "ba" => "bachelor".to_string(),
        t if t.starts_with("master") => "master".to_string(),
        "ms" | "msc" | "mtech" | "mba" | "ma" => "master".to_string(),
        "phd" | "doctorate" => "phd".to_string(),
        t => t.to_string(),
    }
}

/// Categorical education score: 100 with no requirement or full keyword
/// coverage, 60 on partial/related overlap, 20 when a stated requirement
/// finds no echo in the candidate's education entries.
fn education_score(education: &[String], requirement: Option<&str>) -> u32 {
    let Some(requirement) = requirement else {
        return 100;
    };
    let required = education_tokens(requirement);
    if required.is_empty() {
        return 100;
    }

    let candidate = education_tokens(&education.join(" "));
    let hits = required.intersection(&candidate).count();

    if hits == required.len() {
        100
    } else if hits > 0 {
        60
    } else {
        20
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Role level inference
// ────────────────────────────────────────────────────────────────────────────

struct LevelIndicators {
    level: RoleLevel,
    keywords: &'static [&'static str],
    experience_range: (u32, u32),
}

const LEVEL_INDICATORS: &[LevelIndicators] = &[
    LevelIndicators {
        level: RoleLevel::Intern,
        keywords: &["intern", "internship", "trainee", "student", "entry-level"],
        experience_range: (0, 1),
    },
    LevelIndicators {
        level: RoleLevel::Junior,
        keywords: &["junior", "associate", "graduate", "entry level", "fresher"],
        experience_range: (0, 2),
    },
    LevelIndicators {
        level: RoleLevel::Mid,
        keywords: &["mid-level", "mid level", "intermediate", "3+ years"],
        experience_range: (2, 5),
    },
    LevelIndicators {
        level: RoleLevel::Senior,
        keywords: &["senior", "sr.", "experienced", "5+ years", "7+ years", "expert"],
        experience_range: (5, 10),
    },
    LevelIndicators {
        level: RoleLevel::Lead,
        keywords: &["lead", "principal", "staff", "architect", "head", "director", "10+ years"],
        experience_range: (8, 20),
    },
];

/// Infers the role level from JD title/description keywords and the stated
/// experience minimum. Defaults to Mid when nothing signals a level.
pub fn infer_role_level(job: &JobDescription) -> RoleLevel {
    let jd_text = format!("{} {}", job.title, job.description).to_lowercase();

    let mut best = RoleLevel::Mid;
    let mut best_score = 0u32;

    for indicators in LEVEL_INDICATORS {
        let mut level_score = 0u32;
        for keyword in indicators.keywords {
            if contains_token(&jd_text, keyword) {
                level_score += 2;
            }
        }
        if let Some(min_years) = job.min_experience_years {
            let (lo, hi) = indicators.experience_range;
            if (lo..=hi).contains(&min_years) {
                level_score += 3;
            }
        }
        if level_score > best_score {
            best_score = level_score;
            best = indicators.level;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(years: Option<u32>, education: &[&str]) -> CandidateProfile {
        CandidateProfile {
            candidate_id: "CAND-1".to_string(),
            name: "Test".to_string(),
            email: None,
            phone: None,
            experience_years: years,
            skills: vec![],
            education: education.iter().map(|s| s.to_string()).collect(),
            experience_summary: String::new(),
            raw_text: String::new(),
        }
    }

    fn job(min_years: Option<u32>, education: Option<&str>) -> JobDescription {
        JobDescription {
            id: "JD-1".to_string(),
            title: "Engineer".to_string(),
            description: "Build things".to_string(),
            mandatory_skills: vec![],
            optional_skills: vec![],
            min_experience_years: min_years,
            education_requirements: education.map(|s| s.to_string()),
        }
    }

    fn skill_match(pct: u32) -> SkillMatch {
        SkillMatch {
            matched_mandatory: vec![],
            matched_optional: vec![],
            missing_skills: vec![],
            match_percentage: pct,
        }
    }

    #[test]
    fn test_experience_unset_requirement_full_credit() {
        assert_eq!(experience_score(None, None), 100);
        assert_eq!(experience_score(None, Some(3)), 100);
        assert_eq!(experience_score(Some(0), None), 100);
    }

    #[test]
    fn test_experience_unverifiable_scores_zero() {
        // min 5 years required, candidate years unknown
        assert_eq!(experience_score(Some(5), None), 0);
    }

    #[test]
    fn test_experience_linear_and_capped() {
        assert_eq!(experience_score(Some(5), Some(5)), 100);
        assert_eq!(experience_score(Some(5), Some(10)), 100);
        assert_eq!(experience_score(Some(5), Some(2)), 40);
        assert_eq!(experience_score(Some(4), Some(3)), 75);
    }

    #[test]
    fn test_education_no_requirement_full_credit() {
        assert_eq!(education_score(&[], None), 100);
    }

    #[test]
    fn test_education_exact_overlap() {
        let edu = vec!["B.Tech in Computer Science, IIT Delhi".to_string()];
        assert_eq!(
            education_score(&edu, Some("Bachelor's degree in Computer Science")),
            100
        );
    }

    #[test]
    fn test_education_partial_overlap() {
        let edu = vec!["Bachelor of Arts in Economics".to_string()];
        assert_eq!(
            education_score(&edu, Some("Bachelor's degree in Computer Science")),
            60
        );
    }

    #[test]
    fn test_education_no_overlap() {
        let edu = vec!["High school".to_string()];
        assert_eq!(
            education_score(&edu, Some("Master's degree in Computer Science")),
            20
        );
        assert_eq!(
            education_score(&[], Some("Master's degree in Computer Science")),
            20
        );
    }

    #[test]
    fn test_final_score_weighted_and_bounded() {
        let policy = ScoringPolicy::default();
        let p = profile(Some(5), &["Bachelor in Computer Science"]);
        let j = job(Some(5), Some("Bachelor in Computer Science"));
        let breakdown = score(&p, &j, &skill_match(33), &policy);

        assert_eq!(breakdown.skills_score, 33);
        assert_eq!(breakdown.experience_score, 100);
        assert_eq!(breakdown.education_score, 100);
        // 0.5*33 + 0.3*100 + 0.2*100 = 66.5 → 67
        assert_eq!(breakdown.final_score, 67);
        assert!(breakdown.final_score <= 100);
    }

    #[test]
    fn test_score_is_deterministic() {
        let policy = ScoringPolicy::default();
        let p = profile(Some(3), &["MSc Artificial Intelligence"]);
        let j = job(Some(5), Some("Master's in AI or related field"));
        let m = skill_match(72);
        let first = score(&p, &j, &m, &policy);
        let second = score(&p, &j, &m, &policy);
        assert_eq!(first, second);
    }

    #[test]
    fn test_recommendation_thresholds() {
        let policy = ScoringPolicy::default();
        assert_eq!(recommendation_for(80, &policy), Recommendation::StrongFit);
        assert_eq!(recommendation_for(92, &policy), Recommendation::StrongFit);
        assert_eq!(recommendation_for(79, &policy), Recommendation::ModerateFit);
        assert_eq!(recommendation_for(55, &policy), Recommendation::ModerateFit);
        assert_eq!(recommendation_for(54, &policy), Recommendation::WeakFit);
        assert_eq!(recommendation_for(0, &policy), Recommendation::WeakFit);
    }

    #[test]
    fn test_role_level_senior_keywords() {
        let mut j = job(Some(6), None);
        j.title = "Senior Python Developer".to_string();
        j.description = "We need an experienced engineer, 5+ years preferred.".to_string();
        assert_eq!(infer_role_level(&j), RoleLevel::Senior);
    }

    #[test]
    fn test_role_level_intern() {
        let mut j = job(Some(0), None);
        j.title = "Software Engineering Intern".to_string();
        j.description = "Summer internship for students.".to_string();
        assert_eq!(infer_role_level(&j), RoleLevel::Intern);
    }

    #[test]
    fn test_role_level_defaults_to_mid() {
        let j = job(None, None);
        assert_eq!(infer_role_level(&j), RoleLevel::Mid);
    }
}
