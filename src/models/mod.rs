//! Data models for recollect.
//!
//! This module contains the core data structures shared by the inheritance
//! and recall pipelines.

mod memory;
mod recall;

pub use memory::{Category, MemoryItem, MemorySource, MergePolicy, MergedMemorySet};
pub use recall::{
    QueryContext, RecallCandidate, RecallOptions, RecallScope, ResultSource, ScoredResult,
};
