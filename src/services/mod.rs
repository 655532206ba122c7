//! Business logic services.
//!
//! Services orchestrate the collaborator seams (workspace detector,
//! embedder, vector store) and provide the high-level inheritance and
//! recall operations.

mod dedupe;
mod inheritance;
mod recall;
mod scope;
mod scoring;

pub use dedupe::dedupe_by_id;
pub use inheritance::{InheritanceService, merge_items};
pub use recall::RecallService;
pub use scope::ScopeFilter;
pub use scoring::{RelevanceScorer, ScoredCandidate};
