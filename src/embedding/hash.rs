//! Deterministic hash-based embedder.

use super::EmbeddingClient;
use crate::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Default number of dimensions for hash embeddings.
const DEFAULT_DIMENSIONS: usize = 256;

/// Bounds per-call work on pathological inputs.
const WORD_CAP: usize = 1000;

/// Embedder producing deterministic, normalized pseudo-embeddings from word
/// hashes.
///
/// Hash embeddings carry no semantic signal; identical texts match and
/// overlapping word sets correlate, nothing more. They exist so the binary
/// and the test suite work without a model download. Text containing no
/// words yields no vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Creates an embedder with the default dimensions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Creates an embedder with custom dimensions.
    #[must_use]
    pub const fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn build_embedding(&self, text: &str) -> Option<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let mut words = 0usize;

        for (position, word) in text.split_whitespace().take(WORD_CAP).enumerate() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            spread(&mut embedding, hasher.finish(), position);
            words += 1;
        }

        if words == 0 {
            return None;
        }

        normalize(&mut embedding);
        Some(embedding)
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingClient for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>> {
        Ok(self.build_embedding(text))
    }
}

/// Spreads one word hash over the embedding, byte by byte, centered on zero.
fn spread(embedding: &mut [f32], hash: u64, position: usize) {
    let dimensions = embedding.len();
    for byte_index in 0..8 {
        let slot = ((hash >> (byte_index * 8)) as usize + position) % dimensions;
        let byte = (hash >> (byte_index * 4)) & 0xFF;
        embedding[slot] += byte as f32 / 255.0 - 0.5;
    }
}

fn normalize(embedding: &mut [f32]) {
    let norm_sq: f32 = embedding.iter().map(|x| x * x).sum();
    if norm_sq <= 0.0 {
        return;
    }
    let inv_norm = norm_sq.sqrt().recip();
    for value in embedding.iter_mut() {
        *value *= inv_norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[tokio::test]
    async fn test_embed_is_deterministic() {
        let embedder = HashEmbedder::new();
        let first = embedder.embed("tokio runtime tuning").await.unwrap();
        let second = embedder.embed("tokio runtime tuning").await.unwrap();
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[tokio::test]
    async fn test_embed_has_configured_dimensions() {
        let embedder = HashEmbedder::with_dimensions(64);
        let embedding = embedder.embed("one two three").await.unwrap().unwrap();
        assert_eq!(embedding.len(), 64);
        assert_eq!(embedder.dimensions(), 64);
    }

    #[tokio::test]
    async fn test_embed_is_normalized() {
        let embedder = HashEmbedder::new();
        let embedding = embedder
            .embed("normalize this vector please")
            .await
            .unwrap()
            .unwrap();
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_wordless_text_has_no_vector() {
        let embedder = HashEmbedder::new();
        assert_eq!(embedder.embed("").await.unwrap(), None);
        assert_eq!(embedder.embed("   \t\n  ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed("rust borrow checker").await.unwrap().unwrap();
        let b = embedder.embed("python type hints").await.unwrap().unwrap();
        assert!(cosine_similarity(&a, &b) < 0.99);
    }

    #[tokio::test]
    async fn test_identical_texts_fully_similar() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed("cache invalidation").await.unwrap().unwrap();
        let b = embedder.embed("cache invalidation").await.unwrap().unwrap();
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_very_long_text_is_capped() {
        let embedder = HashEmbedder::new();
        let long_text = "word ".repeat(10_000);
        let embedding = embedder.embed(&long_text).await.unwrap().unwrap();
        assert_eq!(embedding.len(), 256);
        assert!(embedding.iter().all(|v| v.is_finite()));
    }
}
