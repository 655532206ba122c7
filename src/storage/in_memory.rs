//! In-memory vector store.

use super::VectorStore;
use crate::Result;
use crate::embedding::cosine_similarity;
use crate::models::RecallCandidate;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredCandidate {
    candidate: RecallCandidate,
    embedding: Vec<f32>,
}

/// Vector store holding candidates and their embeddings in process memory.
///
/// Search is a full cosine scan, fine for the per-invocation indexes the
/// binary builds and for tests. Nothing is persisted.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<StoredCandidate>>,
}

impl InMemoryVectorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Adds a candidate with its embedding.
    pub async fn insert(&self, candidate: RecallCandidate, embedding: Vec<f32>) {
        let mut entries = self.entries.write().await;
        entries.push(StoredCandidate {
            candidate,
            embedding,
        });
    }

    /// Number of stored candidates.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the store holds no candidates.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Removes all candidates.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<RecallCandidate>> {
        let entries = self.entries.read().await;

        let mut results: Vec<RecallCandidate> = entries
            .iter()
            .map(|entry| {
                let mut candidate = entry.candidate.clone();
                candidate.similarity = cosine_similarity(embedding, &entry.embedding);
                candidate
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        tracing::debug!(returned = results.len(), limit, "vector search");
        Ok(results)
    }
}
