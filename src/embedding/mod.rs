//! Query embedding generation.
//!
//! Recall only ever needs one embedding per query, produced through the
//! [`EmbeddingClient`] seam. The built-in [`HashEmbedder`] gives the binary
//! and tests a deterministic, dependency-free implementation.

// Allow cast precision loss for hash-based embedding calculations.
#![allow(clippy::cast_precision_loss)]
// Allow cast possible truncation for hash index calculations on 32-bit platforms.
#![allow(clippy::cast_possible_truncation)]

mod hash;

pub use hash::HashEmbedder;

use crate::Result;
use async_trait::async_trait;

/// Produces query embeddings for recall.
///
/// `Ok(None)` means the provider ran but has no vector for this input, for
/// example a degraded model or unsupported text. Recall treats that as "no
/// results" rather than an error. `Err` is reserved for real failures and
/// propagates to the caller.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Returns the embedding dimensions.
    fn dimensions(&self) -> usize;

    /// Generates an embedding for the given text.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider itself fails; absence of a vector
    /// is `Ok(None)`, not an error.
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>>;
}

/// Computes cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`, or `0.0` when the vectors are empty,
/// mismatched in length, or zero-magnitude.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).fold(0.0, |acc, (x, y)| x.mul_add(*y, acc));
    let norm_a = a.iter().fold(0.0, |acc: f32, x| x.mul_add(*x, acc)).sqrt();
    let norm_b = b.iter().fold(0.0, |acc: f32, x| x.mul_add(*x, acc)).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
