//! Resume parsing — raw resume text to a structured `CandidateProfile`.
//!
//! Every field extraction is independent and infallible: a resume with no
//! detectable email still yields a profile, the field is just absent.
//! Partial extraction is logged, never raised.

pub mod vocabulary;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::candidate::CandidateProfile;
use vocabulary::{normalize_skill, DEGREE_KEYWORDS, SKILL_KEYWORDS};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\(?[0-9]{1,3}\)?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}").unwrap()
});

/// Phrasings that pair a number with a time-unit token. All hits are
/// collected and the maximum wins.
static EXPERIENCE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(\d{1,2})\+?\s*years?\s*(?:of\s*)?(?:experience|exp)").unwrap(),
        Regex::new(r"experience\s*(?:of|:)?\s*(\d{1,2})\+?\s*years?").unwrap(),
        Regex::new(r"(\d{1,2})\+?\s*yrs?\s*(?:of\s*)?(?:experience|exp)").unwrap(),
    ]
});

static SUMMARY_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:professional\s+)?(summary|objective|profile|about)\s*:?\s*(.*)$")
        .unwrap()
});

const MAX_EDUCATION_ENTRIES: usize = 5;
const SUMMARY_MAX_CHARS: usize = 500;
const FALLBACK_SUMMARY_CHARS: usize = 300;

/// Parses raw resume text into a structured profile.
///
/// `extra_vocabulary` is the set of job-specific skills known to the system
/// (every mandatory/optional skill of registered jobs); it is unioned with
/// the static dictionary so parsing recognizes whatever jobs ask for.
pub fn parse(
    candidate_id: &str,
    candidate_name: &str,
    raw_text: &str,
    extra_vocabulary: &[String],
) -> CandidateProfile {
    let cleaned = clean_text(raw_text);
    let cleaned_lower = cleaned.to_lowercase();

    let email = extract_email(&cleaned);
    let phone = extract_phone(&cleaned);
    let experience_years = extract_experience_years(&cleaned_lower);
    let skills = extract_skills(&cleaned_lower, extra_vocabulary);
    let education = extract_education(raw_text);
    let experience_summary = extract_summary(raw_text, &cleaned);

    if email.is_none() || experience_years.is_none() {
        debug!(
            candidate_id,
            email_found = email.is_some(),
            years_found = experience_years.is_some(),
            "partial resume extraction"
        );
    }

    CandidateProfile {
        candidate_id: candidate_id.to_string(),
        name: candidate_name.to_string(),
        email,
        phone,
        experience_years,
        skills,
        education,
        experience_summary,
        raw_text: raw_text.to_string(),
    }
}

/// Collapses whitespace runs and strips control characters.
fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for c in text.chars() {
        if c.is_control() || c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim_end().to_string()
}

fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().trim().to_string())
}

/// Scans for "N years of experience"-style phrases; multiple hits take the
/// maximum (a resume often states both total and per-role durations).
fn extract_experience_years(text_lower: &str) -> Option<u32> {
    let mut best: Option<u32> = None;
    for re in EXPERIENCE_RES.iter() {
        for caps in re.captures_iter(text_lower) {
            if let Some(years) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                best = Some(best.map_or(years, |b| b.max(years)));
            }
        }
    }
    best
}

/// True when `needle` occurs in `haystack` at token boundaries. Boundaries
/// are only enforced on sides where the needle edge is alphanumeric, so
/// entries like "c++" and "c#" still match at end of word.
pub(crate) fn contains_token(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let first_alnum = needle.chars().next().is_some_and(|c| c.is_alphanumeric());
    let last_alnum = needle.chars().last().is_some_and(|c| c.is_alphanumeric());

    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let abs = start + pos;
        let before_ok = !first_alnum
            || haystack[..abs]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = !last_alnum
            || haystack[abs + needle.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = abs + needle.len();
    }
    false
}

/// Matches the combined vocabulary against the resume text and returns the
/// normalized, sorted, deduplicated skill set.
fn extract_skills(text_lower: &str, extra_vocabulary: &[String]) -> Vec<String> {
    let mut found = std::collections::BTreeSet::new();

    for skill in SKILL_KEYWORDS
        .iter()
        .map(|s| s.to_string())
        .chain(extra_vocabulary.iter().cloned())
    {
        let needle = skill.to_lowercase();
        if contains_token(text_lower, &needle) {
            found.insert(normalize_skill(&skill));
        }
    }

    found.into_iter().collect()
}

/// Collects lines mentioning a degree/credential keyword, in order of
/// appearance, capped at `MAX_EDUCATION_ENTRIES`.
fn extract_education(raw_text: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in raw_text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if DEGREE_KEYWORDS.iter().any(|kw| contains_token(&lower, kw)) {
            let cleaned = clean_text(trimmed);
            if !entries.contains(&cleaned) {
                entries.push(cleaned);
                if entries.len() == MAX_EDUCATION_ENTRIES {
                    break;
                }
            }
        }
    }
    entries
}

/// Pulls the summary/objective/profile section when one exists, else falls
/// back to the first `FALLBACK_SUMMARY_CHARS` characters of cleaned text.
fn extract_summary(raw_text: &str, cleaned: &str) -> String {
    let lines: Vec<&str> = raw_text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if let Some(caps) = SUMMARY_HEADER_RE.captures(line) {
            let mut parts: Vec<String> = Vec::new();
            if let Some(rest) = caps.get(2) {
                let rest = rest.as_str().trim();
                if !rest.is_empty() {
                    parts.push(rest.to_string());
                }
            }
            for follow in lines.iter().skip(i + 1).take(5) {
                let follow = follow.trim();
                if follow.is_empty() {
                    break;
                }
                parts.push(follow.to_string());
            }
            let summary = clean_text(&parts.join(" "));
            if summary.len() >= 50 {
                return truncate_chars(&summary, SUMMARY_MAX_CHARS);
            }
        }
    }

    if cleaned.chars().count() > FALLBACK_SUMMARY_CHARS {
        format!("{}...", truncate_chars(cleaned, FALLBACK_SUMMARY_CHARS))
    } else {
        cleaned.to_string()
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
John Doe
john.doe@example.com | +1 (555) 123-4567

Summary: Backend engineer with a focus on distributed systems and developer
tooling, comfortable owning services end to end.

Experience
8 years of experience building APIs in Python and Go.
Previously 3 years of experience in data engineering.

Skills: Python, Go, Docker, Kubernetes, PostgreSQL, REST

Education
B.Tech in Computer Science, IIT Delhi, 2014
Certificate in Machine Learning, Coursera
";

    #[test]
    fn test_parse_extracts_contact_fields() {
        let profile = parse("CAND-1", "John Doe", RESUME, &[]);
        assert_eq!(profile.email.as_deref(), Some("john.doe@example.com"));
        assert!(profile.phone.is_some());
    }

    #[test]
    fn test_experience_years_takes_maximum() {
        let profile = parse("CAND-1", "John Doe", RESUME, &[]);
        assert_eq!(profile.experience_years, Some(8));
    }

    #[test]
    fn test_experience_years_absent_when_unstated() {
        let profile = parse("CAND-2", "Jane", "Engineer. Knows Python.", &[]);
        assert_eq!(profile.experience_years, None);
    }

    #[test]
    fn test_skills_found_and_normalized() {
        let profile = parse("CAND-1", "John Doe", RESUME, &[]);
        assert!(profile.skills.contains(&"Python".to_string()));
        assert!(profile.skills.contains(&"Docker".to_string()));
        assert!(profile.skills.contains(&"Kubernetes".to_string()));
        assert!(profile.skills.contains(&"PostgreSQL".to_string()));
        // "REST" normalizes to the canonical label
        assert!(profile.skills.contains(&"REST API".to_string()));
    }

    #[test]
    fn test_extra_vocabulary_extends_matching() {
        let text = "Deep expertise in Apache Flink stream processing.";
        let without = parse("CAND-1", "A", text, &[]);
        assert!(!without.skills.iter().any(|s| s.contains("Flink")));

        let with = parse("CAND-1", "A", text, &["Apache Flink".to_string()]);
        assert!(with.skills.contains(&"Apache Flink".to_string()));
    }

    #[test]
    fn test_education_lines_preserved_in_order() {
        let profile = parse("CAND-1", "John Doe", RESUME, &[]);
        assert_eq!(profile.education.len(), 2);
        assert!(profile.education[0].contains("B.Tech"));
        assert!(profile.education[1].contains("Certificate"));
    }

    #[test]
    fn test_summary_prefers_section() {
        let profile = parse("CAND-1", "John Doe", RESUME, &[]);
        assert!(profile.experience_summary.starts_with("Backend engineer"));
        assert!(profile.experience_summary.len() <= 500);
    }

    #[test]
    fn test_summary_falls_back_to_prefix() {
        let long_text = "word ".repeat(200);
        let profile = parse("CAND-1", "A", &long_text, &[]);
        assert!(profile.experience_summary.ends_with("..."));
        assert!(profile.experience_summary.chars().count() <= 303);
    }

    #[test]
    fn test_malformed_input_never_panics() {
        for text in ["", "   \n\n\t", "@@@@", "\u{0000}\u{0001}binary"] {
            let profile = parse("CAND-X", "N", text, &[]);
            assert!(profile.email.is_none());
            assert!(profile.skills.is_empty());
        }
    }

    #[test]
    fn test_token_boundaries_respected() {
        // "Java" must not match inside "JavaScript"
        let profile = parse("CAND-1", "A", "Expert in JavaScript only.", &[]);
        assert!(profile.skills.contains(&"JavaScript".to_string()));
        assert!(!profile.skills.contains(&"Java".to_string()));
    }

    #[test]
    fn test_symbolic_skills_match_at_word_end() {
        let profile = parse("CAND-1", "A", "Shipped services in C++ and C#.", &[]);
        assert!(profile.skills.contains(&"C++".to_string()));
        assert!(profile.skills.contains(&"C#".to_string()));
    }
}
