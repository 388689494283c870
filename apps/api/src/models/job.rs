use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job description registered with the engine. Identity is `id`;
/// everything else is mutable via explicit update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub mandatory_skills: Vec<String>,
    #[serde(default)]
    pub optional_skills: Vec<String>,
    #[serde(default)]
    pub min_experience_years: Option<u32>,
    #[serde(default)]
    pub education_requirements: Option<String>,
}

impl JobDescription {
    /// Generates a short human-scannable job id, e.g. `JD-3FA9C1D2`.
    pub fn generate_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("JD-{}", hex[..8].to_uppercase())
    }

    /// The job text handed to retrieval and the LLM: title, description,
    /// and the education requirement when present.
    pub fn prompt_text(&self) -> String {
        let mut text = format!("Title: {}\n\nDescription: {}", self.title, self.description);
        if let Some(edu) = &self.education_requirements {
            text.push_str(&format!("\n\nEducation Requirements: {edu}"));
        }
        text
    }
}
