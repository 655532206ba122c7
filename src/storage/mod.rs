//! Vector store abstraction.
//!
//! Recall reads candidates from a [`VectorStore`]; this crate never writes
//! through the trait, persistence belongs to the backing system. The bundled
//! [`InMemoryVectorStore`] covers the binary and the test suite.

mod in_memory;

pub use in_memory::InMemoryVectorStore;

use crate::Result;
use crate::models::RecallCandidate;
use async_trait::async_trait;

/// Trait for candidate retrieval backends.
///
/// Implementations should be thread-safe (`Send + Sync`).
///
/// # Implementor Notes
///
/// - Methods use `&self` to enable sharing via `Arc<dyn VectorStore>`
/// - Use interior mutability (e.g., `RwLock<Vec<_>>`) for mutable state
/// - Returned candidates must carry their raw `similarity` against the
///   query embedding; no particular ordering is assumed, the recall
///   pipeline re-sorts by combined score
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Searches for the candidates nearest to a query embedding.
    ///
    /// # Errors
    ///
    /// Returns an error if the search operation fails.
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<RecallCandidate>>;
}
