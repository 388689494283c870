//! Retrieval-augmented context — resume chunking, the similarity index, and
//! the context builder that grounds LLM evaluation in resume snippets.
//!
//! Retrieval failures degrade to an empty context: an unreachable or empty
//! index must never fail an evaluation.

pub mod chunker;
pub mod vector_store;

use std::sync::Arc;

use tracing::warn;

use chunker::TextChunker;
use vector_store::{IndexedChunk, VectorIndex};

/// Builds retrieval context for evaluations and keeps the per-job resume
/// collections up to date.
#[derive(Clone)]
pub struct RetrievalContextBuilder {
    index: Arc<dyn VectorIndex>,
    chunker: TextChunker,
    top_k: usize,
}

impl RetrievalContextBuilder {
    pub fn new(index: Arc<dyn VectorIndex>, chunker: TextChunker, top_k: usize) -> Self {
        Self {
            index,
            chunker,
            top_k,
        }
    }

    fn collection(job_id: &str) -> String {
        format!("job_{job_id}_resumes")
    }

    /// Chunks and indexes one resume under the job's collection, replacing
    /// any chunks from a previous upload of the same candidate. Returns the
    /// number of chunks indexed; indexing failure is logged and reported as
    /// zero, it does not fail ingestion.
    pub async fn index_resume(&self, job_id: &str, candidate_id: &str, resume_text: &str) -> usize {
        let chunks: Vec<IndexedChunk> = self
            .chunker
            .chunk(resume_text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| IndexedChunk {
                id: format!("{job_id}_{candidate_id}_chunk_{i}"),
                candidate_id: candidate_id.to_string(),
                text,
            })
            .collect();

        let count = chunks.len();
        if count == 0 {
            return 0;
        }

        match self.index.index(&Self::collection(job_id), chunks).await {
            Ok(()) => count,
            Err(e) => {
                warn!(job_id, candidate_id, error = %e, "resume indexing failed");
                0
            }
        }
    }

    /// Retrieves the chunks of `candidate_id`'s resume most relevant to the
    /// job text and joins them into one context block. Twice the configured
    /// depth is requested so a single evaluation sees a fuller picture.
    /// Unavailable or empty index → empty context.
    pub async fn candidate_context(
        &self,
        job_id: &str,
        candidate_id: &str,
        jd_text: &str,
    ) -> String {
        match self
            .index
            .search(
                &Self::collection(job_id),
                jd_text,
                Some(candidate_id),
                self.top_k * 2,
            )
            .await
        {
            Ok(hits) => hits
                .into_iter()
                .map(|h| h.text)
                .collect::<Vec<_>>()
                .join("\n\n"),
            Err(e) => {
                warn!(job_id, candidate_id, error = %e, "similarity search failed, continuing without context");
                String::new()
            }
        }
    }

    /// Drops the job's whole resume collection (job deletion).
    pub async fn drop_job(&self, job_id: &str) {
        if let Err(e) = self.index.drop_collection(&Self::collection(job_id)).await {
            warn!(job_id, error = %e, "failed to drop resume collection");
        }
    }
}
