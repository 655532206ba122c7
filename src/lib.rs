//! # Recollect
//!
//! Workspace-aware memory recall and inheritance for AI coding assistants.
//!
//! Recollect answers two questions for an assistant working in a repository:
//! which stored notes are relevant to what the user is doing right now, and
//! which notes does this project inherit from the workspace that contains it.
//!
//! ## Features
//!
//! - Multi-factor relevance scoring (similarity, recency, project affinity)
//! - Scope-filtered recall with adaptive project-to-workspace widening
//! - Two-tier memory inheritance (project overrides workspace per topic)
//! - Pluggable embedding and vector store seams via async traits
//! - Read-only pipelines: every failure degrades to fewer results
//!
//! ## Example
//!
//! ```rust,ignore
//! use recollect::{QueryContext, RecallOptions, RecallService};
//!
//! let service = RecallService::new(embedder, store);
//! let results = service
//!     .recall("connection pool sizing", &context, &RecallOptions::default())
//!     .await?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
// Cannot be moved to function level. Current duplicates: git2→libgit2-sys transitive deps.
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod context;
pub mod embedding;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::RecollectConfig;
pub use context::{MarkerWorkspaceDetector, WorkspaceDetector, WorkspaceInfo};
pub use embedding::{EmbeddingClient, HashEmbedder};
pub use models::{
    Category, MemoryItem, MemorySource, MergePolicy, MergedMemorySet, QueryContext,
    RecallCandidate, RecallOptions, RecallScope, ResultSource, ScoredResult,
};
pub use services::{InheritanceService, RecallService, RelevanceScorer, ScopeFilter};
pub use storage::{InMemoryVectorStore, VectorStore};

/// Error type for recollect operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown scope, category, or output format names |
/// | `OperationFailed` | Embedding calls fail, vector store queries fail, config I/O fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - An unknown recall scope name is parsed
    /// - A category filter names no known category
    /// - An unknown output format is requested
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - An embedding provider returns an error (as opposed to no vector)
    /// - A vector store search fails
    /// - Config file reading or parsing fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for recollect operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in milliseconds.
///
/// Candidate timestamps and recency decay both work in epoch milliseconds,
/// so the crate centralizes "now" here rather than scattering clock reads.
///
/// # Examples
///
/// ```rust
/// use recollect::current_timestamp_ms;
///
/// let ts = current_timestamp_ms();
/// assert!(ts > 0);
/// ```
#[must_use]
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
