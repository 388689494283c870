//! The per-job registry — jobs, candidate profiles, and cached evaluation
//! results, keyed `job_id → candidate_id`.
//!
//! `JobStore` is an explicit repository seam with a defined lifecycle:
//! empty at startup, cleared on teardown, pluggable backing store. The
//! shipped backend is in-memory behind an async `RwLock`; access is always
//! by independent key, so no global lock discipline is needed beyond it.
//!
//! Evaluations are derived artifacts: cached here for reads, overwritten on
//! every re-evaluation (last write wins), always recomputable.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::candidate::CandidateProfile;
use crate::models::evaluation::EvaluationResult;
use crate::models::job::JobDescription;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn upsert_job(&self, job: JobDescription);
    async fn get_job(&self, job_id: &str) -> Option<JobDescription>;
    async fn list_jobs(&self) -> Vec<JobDescription>;
    /// Removes the job with its profiles and cached evaluations.
    async fn remove_job(&self, job_id: &str) -> bool;

    /// Stores (or overwrites) a candidate profile under a job.
    /// Returns false when the job is unknown.
    async fn upsert_profile(&self, job_id: &str, profile: CandidateProfile) -> bool;
    async fn get_profile(&self, job_id: &str, candidate_id: &str) -> Option<CandidateProfile>;
    /// Profiles for a job, ordered by candidate id for reproducibility.
    async fn list_profiles(&self, job_id: &str) -> Vec<CandidateProfile>;

    async fn store_evaluation(&self, result: EvaluationResult);
    async fn get_evaluation(&self, job_id: &str, candidate_id: &str) -> Option<EvaluationResult>;
    async fn list_evaluations(&self, job_id: &str) -> Vec<EvaluationResult>;
    /// Drops cached evaluations for a job (requirements changed, resumes
    /// re-uploaded — the cache is stale either way).
    async fn clear_evaluations(&self, job_id: &str);

    /// Union of every mandatory/optional skill across registered jobs;
    /// feeds the resume parser's vocabulary.
    async fn known_skills(&self) -> Vec<String>;

    /// Teardown: forget everything.
    async fn clear(&self);
}

struct JobEntry {
    job: JobDescription,
    profiles: HashMap<String, CandidateProfile>,
    evaluations: HashMap<String, EvaluationResult>,
}

/// In-memory `JobStore` backend.
#[derive(Default)]
pub struct InMemoryRegistry {
    jobs: RwLock<HashMap<String, JobEntry>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryRegistry {
    async fn upsert_job(&self, job: JobDescription) {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&job.id) {
            Some(entry) => entry.job = job,
            None => {
                jobs.insert(
                    job.id.clone(),
                    JobEntry {
                        job,
                        profiles: HashMap::new(),
                        evaluations: HashMap::new(),
                    },
                );
            }
        }
    }

    async fn get_job(&self, job_id: &str) -> Option<JobDescription> {
        self.jobs.read().await.get(job_id).map(|e| e.job.clone())
    }

    async fn list_jobs(&self) -> Vec<JobDescription> {
        let jobs = self.jobs.read().await;
        let mut list: Vec<JobDescription> = jobs.values().map(|e| e.job.clone()).collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    async fn remove_job(&self, job_id: &str) -> bool {
        self.jobs.write().await.remove(job_id).is_some()
    }

    async fn upsert_profile(&self, job_id: &str, profile: CandidateProfile) -> bool {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(job_id) {
            Some(entry) => {
                entry
                    .profiles
                    .insert(profile.candidate_id.clone(), profile);
                true
            }
            None => false,
        }
    }

    async fn get_profile(&self, job_id: &str, candidate_id: &str) -> Option<CandidateProfile> {
        self.jobs
            .read()
            .await
            .get(job_id)
            .and_then(|e| e.profiles.get(candidate_id).cloned())
    }

    async fn list_profiles(&self, job_id: &str) -> Vec<CandidateProfile> {
        let jobs = self.jobs.read().await;
        let mut profiles: Vec<CandidateProfile> = jobs
            .get(job_id)
            .map(|e| e.profiles.values().cloned().collect())
            .unwrap_or_default();
        profiles.sort_by(|a, b| a.candidate_id.cmp(&b.candidate_id));
        profiles
    }

    async fn store_evaluation(&self, result: EvaluationResult) {
        let mut jobs = self.jobs.write().await;
        if let Some(entry) = jobs.get_mut(&result.job_id) {
            entry
                .evaluations
                .insert(result.candidate_id.clone(), result);
        }
    }

    async fn get_evaluation(&self, job_id: &str, candidate_id: &str) -> Option<EvaluationResult> {
        self.jobs
            .read()
            .await
            .get(job_id)
            .and_then(|e| e.evaluations.get(candidate_id).cloned())
    }

    async fn list_evaluations(&self, job_id: &str) -> Vec<EvaluationResult> {
        let jobs = self.jobs.read().await;
        let mut evaluations: Vec<EvaluationResult> = jobs
            .get(job_id)
            .map(|e| e.evaluations.values().cloned().collect())
            .unwrap_or_default();
        evaluations.sort_by(|a, b| a.candidate_id.cmp(&b.candidate_id));
        evaluations
    }

    async fn clear_evaluations(&self, job_id: &str) {
        let mut jobs = self.jobs.write().await;
        if let Some(entry) = jobs.get_mut(job_id) {
            entry.evaluations.clear();
        }
    }

    async fn known_skills(&self) -> Vec<String> {
        let jobs = self.jobs.read().await;
        let skills: BTreeSet<String> = jobs
            .values()
            .flat_map(|e| {
                e.job
                    .mandatory_skills
                    .iter()
                    .chain(e.job.optional_skills.iter())
                    .cloned()
            })
            .collect();
        skills.into_iter().collect()
    }

    async fn clear(&self) {
        self.jobs.write().await.clear();
    }
}
