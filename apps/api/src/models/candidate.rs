use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured profile extracted from one uploaded resume.
///
/// Created once per upload; re-uploading the same candidate's resume
/// overwrites the profile wholesale. `raw_text` is the immutable source the
/// rest of the pipeline (retrieval, prompts) works from. Fields the parser
/// could not extract are `None`/empty, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<u32>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience_summary: String,
    pub raw_text: String,
}

impl CandidateProfile {
    /// Generates a short candidate id, e.g. `CAND-9B2E41AC`.
    pub fn generate_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("CAND-{}", hex[..8].to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = CandidateProfile::generate_id();
        assert!(id.starts_with("CAND-"));
        assert_eq!(id.len(), 13);
    }
}
