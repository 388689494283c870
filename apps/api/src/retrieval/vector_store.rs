//! The similarity-search seam.
//!
//! `VectorIndex` is the black-box interface the evaluation pipeline talks
//! to; callers never see what backs it. The shipped backend is an
//! in-process, deterministic lexical index — term-frequency cosine over
//! lowercase tokens — which keeps retrieval self-contained and tests
//! hermetic. An external store plugs in by implementing the trait.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// One chunk of resume text stored under a collection.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub id: String,
    pub candidate_id: String,
    pub text: String,
}

/// A retrieved chunk with its similarity score (higher is closer).
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub candidate_id: String,
    pub text: String,
    pub score: f32,
}

/// Similarity store interface. Indexing a candidate again replaces that
/// candidate's previous chunks in the collection.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn index(&self, collection: &str, chunks: Vec<IndexedChunk>) -> Result<()>;

    /// Returns up to `k` chunks most similar to `query`, optionally
    /// restricted to one candidate's chunks.
    async fn search(
        &self,
        collection: &str,
        query: &str,
        candidate_id: Option<&str>,
        k: usize,
    ) -> Result<Vec<ScoredChunk>>;

    async fn drop_collection(&self, collection: &str) -> Result<()>;
}

/// In-process lexical index.
#[derive(Default)]
pub struct InMemoryVectorIndex {
    collections: RwLock<HashMap<String, Vec<IndexedChunk>>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn index(&self, collection: &str, chunks: Vec<IndexedChunk>) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();

        let incoming: std::collections::HashSet<&str> =
            chunks.iter().map(|c| c.candidate_id.as_str()).collect();
        stored.retain(|c| !incoming.contains(c.candidate_id.as_str()));
        stored.extend(chunks);
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: &str,
        candidate_id: Option<&str>,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let collections = self.collections.read().await;
        let Some(stored) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let query_freqs = term_freqs(query);
        let mut scored: Vec<(&IndexedChunk, f32)> = stored
            .iter()
            .filter(|c| candidate_id.is_none_or(|id| c.candidate_id == id))
            .map(|c| (c, cosine(&query_freqs, &term_freqs(&c.text))))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Deterministic ordering: score descending, chunk id as tiebreak
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(c, score)| ScoredChunk {
                candidate_id: c.candidate_id.clone(),
                text: c.text.clone(),
                score,
            })
            .collect())
    }

    async fn drop_collection(&self, collection: &str) -> Result<()> {
        self.collections.write().await.remove(collection);
        Ok(())
    }
}

fn term_freqs(text: &str) -> HashMap<String, f32> {
    let mut freqs = HashMap::new();
    for word in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
        if word.len() >= 2 {
            *freqs.entry(word.to_string()).or_insert(0.0) += 1.0;
        }
    }
    freqs
}

fn cosine(a: &HashMap<String, f32>, b: &HashMap<String, f32>) -> f32 {
    let dot: f32 = a
        .iter()
        .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm_a: f32 = a.values().map(|w| w * w).sum::<f32>().sqrt();
    let norm_b: f32 = b.values().map(|w| w * w).sum::<f32>().sqrt();
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, candidate: &str, text: &str) -> IndexedChunk {
        IndexedChunk {
            id: id.to_string(),
            candidate_id: candidate.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_ranks_relevant_chunks_first() {
        let index = InMemoryVectorIndex::new();
        index
            .index(
                "job_1",
                vec![
                    chunk("c1", "CAND-1", "Led Kubernetes migrations and Docker rollouts"),
                    chunk("c2", "CAND-1", "Organized the annual company picnic"),
                ],
            )
            .await
            .unwrap();

        let hits = index
            .search("job_1", "Kubernetes and Docker platform work", None, 2)
            .await
            .unwrap();
        assert!(!hits.is_empty());
        assert!(hits[0].text.contains("Kubernetes"));
    }

    #[tokio::test]
    async fn test_candidate_filter_restricts_results() {
        let index = InMemoryVectorIndex::new();
        index
            .index(
                "job_1",
                vec![
                    chunk("a", "CAND-1", "Python backend services"),
                    chunk("b", "CAND-2", "Python data pipelines"),
                ],
            )
            .await
            .unwrap();

        let hits = index
            .search("job_1", "Python", Some("CAND-2"), 5)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].candidate_id, "CAND-2");
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty_not_error() {
        let index = InMemoryVectorIndex::new();
        let hits = index.search("job_missing", "anything", None, 3).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_reindex_replaces_candidate_chunks() {
        let index = InMemoryVectorIndex::new();
        index
            .index("job_1", vec![chunk("a", "CAND-1", "Old resume about Java")])
            .await
            .unwrap();
        index
            .index("job_1", vec![chunk("b", "CAND-1", "New resume about Rust")])
            .await
            .unwrap();

        let hits = index.search("job_1", "Java", Some("CAND-1"), 5).await.unwrap();
        assert!(hits.is_empty(), "stale chunks survived re-index");

        let hits = index.search("job_1", "Rust", Some("CAND-1"), 5).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_drop_collection_removes_everything() {
        let index = InMemoryVectorIndex::new();
        index
            .index("job_1", vec![chunk("a", "CAND-1", "Some text here")])
            .await
            .unwrap();
        index.drop_collection("job_1").await.unwrap();
        let hits = index.search("job_1", "text", None, 5).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_deterministic() {
        let index = InMemoryVectorIndex::new();
        index
            .index(
                "job_1",
                vec![
                    chunk("a", "CAND-1", "Rust services in production"),
                    chunk("b", "CAND-2", "Rust services in production"),
                ],
            )
            .await
            .unwrap();

        let first = index.search("job_1", "Rust production", None, 2).await.unwrap();
        let second = index.search("job_1", "Rust production", None, 2).await.unwrap();
        let ids: Vec<_> = first.iter().map(|h| h.candidate_id.clone()).collect();
        let ids2: Vec<_> = second.iter().map(|h| h.candidate_id.clone()).collect();
        assert_eq!(ids, ids2);
    }
}
