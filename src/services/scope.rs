//! Scope filtering with adaptive widening.
//!
//! Project scope widens to workspace scope when the project yields too few
//! results and the workspace has enough to be useful. Widening happens at
//! most once and never reaches global scope; a sparse workspace keeps the
//! sparse project results rather than flooding the caller with strangers.

use super::scoring::ScoredCandidate;
use crate::models::{QueryContext, RecallScope};

/// Project results below this count trigger the workspace fallback, and the
/// fallback only applies when the workspace set reaches it.
const MIN_PROJECT_RESULTS: usize = 3;

/// Narrows a scored candidate set to the requested scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeFilter;

impl ScopeFilter {
    /// Creates a scope filter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies `scope` to a scored set, preserving input order.
    ///
    /// Identity comparisons are on the optional project/workspace fields,
    /// so an untagged candidate matches a context with the same field
    /// absent.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn apply(
        &self,
        scope: RecallScope,
        scored: Vec<ScoredCandidate>,
        context: &QueryContext,
    ) -> Vec<ScoredCandidate> {
        match scope {
            RecallScope::Global => scored,
            RecallScope::Workspace => scored
                .into_iter()
                .filter(|item| item.candidate.workspace == context.workspace)
                .collect(),
            RecallScope::Project => {
                let project: Vec<ScoredCandidate> = scored
                    .iter()
                    .filter(|item| item.candidate.project == context.project_id)
                    .cloned()
                    .collect();
                if project.len() >= MIN_PROJECT_RESULTS {
                    return project;
                }

                // Fallback is computed over the full set, so candidates that
                // match both identities are counted once on each side.
                let workspace: Vec<ScoredCandidate> = scored
                    .into_iter()
                    .filter(|item| item.candidate.workspace == context.workspace)
                    .collect();
                if workspace.len() >= MIN_PROJECT_RESULTS {
                    tracing::debug!(
                        project_results = project.len(),
                        workspace_results = workspace.len(),
                        "widened project scope to workspace"
                    );
                    workspace
                } else {
                    project
                }
            }
        }
    }
}
