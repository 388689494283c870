use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::RetryPolicy;
use crate::scoring::ScoringPolicy;

/// Application configuration loaded from environment variables.
///
/// Scoring weights, recommendation thresholds, retrieval depth, and the
/// upstream retry policy are deliberate knobs here rather than constants in
/// the modules that use them.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub retry: RetryPolicy,
    pub scoring: ScoringPolicy,
    /// Chunks retrieved per similarity query.
    pub top_k_chunks: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_resumes_per_job: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_base_url: env_or("LLM_BASE_URL", "https://api.groq.com/openai/v1"),
            llm_model: env_or("LLM_MODEL", "llama-3.1-8b-instant"),
            retry: RetryPolicy {
                max_attempts: parse_env("LLM_MAX_ATTEMPTS", 2)?,
                timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 30)?),
            },
            scoring: ScoringPolicy {
                skills_weight: parse_env("SCORING_SKILLS_WEIGHT", 0.5)?,
                experience_weight: parse_env("SCORING_EXPERIENCE_WEIGHT", 0.3)?,
                education_weight: parse_env("SCORING_EDUCATION_WEIGHT", 0.2)?,
                strong_fit_threshold: parse_env("SCORING_STRONG_FIT_THRESHOLD", 80)?,
                moderate_fit_threshold: parse_env("SCORING_MODERATE_FIT_THRESHOLD", 55)?,
            },
            top_k_chunks: parse_env("TOP_K_CHUNKS", 5)?,
            chunk_size: parse_env("CHUNK_SIZE", 500)?,
            chunk_overlap: parse_env("CHUNK_OVERLAP", 50)?,
            max_resumes_per_job: parse_env("MAX_RESUMES_PER_JOB", 50)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}
