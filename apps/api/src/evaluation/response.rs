//! Defensive parsing of LLM evaluation responses.
//!
//! Model output is duck-typed JSON at best and prose at worst, so acceptance
//! is a tagged outcome rather than hope-based string handling: a strict
//! structural parse with schema validation, then a labeled-section text
//! fallback, and `Malformed` carrying the raw text when neither yields
//! anything usable.

use serde::Deserialize;

use crate::llm_client::strip_json_fences;

/// Qualitative fields extracted from a model response. Every field is
/// optional on the wire; validation decides whether enough survived.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default, alias = "gaps")]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default, alias = "confidence_notes")]
    pub confidence_note: Option<String>,
}

impl Assessment {
    /// Schema validation: an assessment with no commentary at all is not
    /// accepted, whatever shape it arrived in.
    fn has_content(&self) -> bool {
        !self.strengths.is_empty()
            || !self.weaknesses.is_empty()
            || !self.summary.trim().is_empty()
            || self.recommendation.is_some()
    }
}

/// Outcome of parsing one model response.
#[derive(Debug)]
pub enum AssessmentOutcome {
    Parsed(Assessment),
    Malformed(String),
}

/// Parses a raw model response. Strict JSON first (after fence stripping),
/// then labeled-section extraction from free text.
pub fn parse_assessment(raw: &str) -> AssessmentOutcome {
    let stripped = strip_json_fences(raw);

    if let Ok(assessment) = serde_json::from_str::<Assessment>(stripped) {
        if assessment.has_content() {
            return AssessmentOutcome::Parsed(assessment);
        }
    }

    if let Some(assessment) = extract_labeled_sections(raw) {
        return AssessmentOutcome::Parsed(assessment);
    }

    AssessmentOutcome::Malformed(raw.to_string())
}

#[derive(PartialEq)]
enum Section {
    None,
    Strengths,
    Weaknesses,
    Summary,
    Recommendation,
}

/// Best-effort extraction of `Strengths:` / `Weaknesses:` / `Summary:` /
/// `Recommendation:` sections from prose output.
fn extract_labeled_sections(raw: &str) -> Option<Assessment> {
    let mut assessment = Assessment::default();
    let mut section = Section::None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let lower = trimmed.to_lowercase();
        let (new_section, rest) = if let Some(rest) = lower.strip_prefix("strengths") {
            (Section::Strengths, rest)
        } else if let Some(rest) = lower.strip_prefix("weaknesses") {
            (Section::Weaknesses, rest)
        } else if let Some(rest) = lower.strip_prefix("gaps") {
            (Section::Weaknesses, rest)
        } else if let Some(rest) = lower.strip_prefix("summary") {
            (Section::Summary, rest)
        } else if let Some(rest) = lower.strip_prefix("recommendation") {
            (Section::Recommendation, rest)
        } else {
            (Section::None, "")
        };

        if new_section != Section::None && rest.trim_start().starts_with(':') {
            // Header line; keep anything after the colon as content
            let after = match trimmed.find(':') {
                Some(idx) => trimmed[idx + 1..].trim(),
                None => "",
            };
            match new_section {
                Section::Summary if !after.is_empty() => assessment.summary = after.to_string(),
                Section::Recommendation if !after.is_empty() => {
                    assessment.recommendation = Some(after.to_string())
                }
                Section::Strengths if !after.is_empty() => {
                    assessment.strengths.push(after.to_string())
                }
                Section::Weaknesses if !after.is_empty() => {
                    assessment.weaknesses.push(after.to_string())
                }
                _ => {}
            }
            section = new_section;
            continue;
        }

        let content = trimmed
            .trim_start_matches(['-', '*', '•'])
            .trim()
            .to_string();
        if content.is_empty() {
            continue;
        }

        match section {
            Section::Strengths => assessment.strengths.push(content),
            Section::Weaknesses => assessment.weaknesses.push(content),
            Section::Summary => {
                if assessment.summary.is_empty() {
                    assessment.summary = content;
                } else {
                    assessment.summary.push(' ');
                    assessment.summary.push_str(&content);
                }
            }
            Section::Recommendation => {
                if assessment.recommendation.is_none() {
                    assessment.recommendation = Some(content);
                }
            }
            Section::None => {}
        }
    }

    assessment.has_content().then_some(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json_parses() {
        let raw = r#"{
            "strengths": ["Deep Python expertise", "Production AWS experience"],
            "weaknesses": ["No FastAPI exposure"],
            "summary": "Solid backend candidate.",
            "recommendation": "Strong Fit",
            "confidence_note": "Resume shows 6 years of directly relevant work."
        }"#;
        match parse_assessment(raw) {
            AssessmentOutcome::Parsed(a) => {
                assert_eq!(a.strengths.len(), 2);
                assert_eq!(a.weaknesses.len(), 1);
                assert_eq!(a.recommendation.as_deref(), Some("Strong Fit"));
            }
            AssessmentOutcome::Malformed(_) => panic!("expected parse"),
        }
    }

    #[test]
    fn test_fenced_json_parses() {
        let raw = "```json\n{\"summary\": \"Good fit overall.\", \"strengths\": [\"Rust\"]}\n```";
        assert!(matches!(
            parse_assessment(raw),
            AssessmentOutcome::Parsed(_)
        ));
    }

    #[test]
    fn test_gaps_alias_maps_to_weaknesses() {
        let raw = r#"{"summary": "ok", "gaps": ["No cloud experience"]}"#;
        match parse_assessment(raw) {
            AssessmentOutcome::Parsed(a) => assert_eq!(a.weaknesses.len(), 1),
            AssessmentOutcome::Malformed(_) => panic!("expected parse"),
        }
    }

    #[test]
    fn test_labeled_text_fallback() {
        let raw = "\
Here is my evaluation.

Strengths:
- Strong distributed systems background
- Clear ownership of production services

Weaknesses:
- Little frontend exposure

Summary: A capable systems engineer well matched to the role.
Recommendation: Moderate Fit";
        match parse_assessment(raw) {
            AssessmentOutcome::Parsed(a) => {
                assert_eq!(a.strengths.len(), 2);
                assert_eq!(a.weaknesses.len(), 1);
                assert!(a.summary.contains("capable systems engineer"));
                assert_eq!(a.recommendation.as_deref(), Some("Moderate Fit"));
            }
            AssessmentOutcome::Malformed(_) => panic!("expected fallback parse"),
        }
    }

    #[test]
    fn test_unusable_text_is_malformed() {
        let raw = "I'm sorry, I cannot evaluate this candidate.";
        match parse_assessment(raw) {
            AssessmentOutcome::Malformed(kept) => assert_eq!(kept, raw),
            AssessmentOutcome::Parsed(_) => panic!("expected malformed"),
        }
    }

    #[test]
    fn test_empty_json_object_is_malformed() {
        // Structurally valid JSON with no content must not be accepted
        assert!(matches!(
            parse_assessment("{}"),
            AssessmentOutcome::Malformed(_)
        ));
    }

    #[test]
    fn test_valid_json_wrong_types_falls_through() {
        let raw = r#"{"strengths": "not a list", "summary": 42}"#;
        assert!(matches!(
            parse_assessment(raw),
            AssessmentOutcome::Malformed(_)
        ));
    }
}
