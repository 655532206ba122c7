//! Semantic recall over stored memory.
//!
//! The pipeline runs in a fixed order: embed the query, over-fetch from
//! the vector store, score, filter by kind, apply scope (with automatic
//! widening), collapse duplicate ids, apply the similarity floor, then
//! sort and truncate to the requested limit.

use crate::embedding::EmbeddingClient;
use crate::models::{QueryContext, RecallOptions, ScoredResult};
use crate::services::{dedupe_by_id, RelevanceScorer, ScopeFilter};
use crate::storage::VectorStore;
use crate::Result;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Candidates fetched per requested result, so scope filtering and
/// deduplication still leave enough to fill the limit.
const OVERFETCH_FACTOR: usize = 3;

/// Result limit used when recalling for ambient context injection.
const CONTEXT_RECALL_LIMIT: usize = 5;

/// Recalls stored memories ranked by relevance to a query.
pub struct RecallService {
    embedder: Arc<dyn EmbeddingClient>,
    store: Arc<dyn VectorStore>,
}

impl RecallService {
    /// Creates a recall service over an embedder and a vector store.
    pub fn new(embedder: Arc<dyn EmbeddingClient>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Recalls memories relevant to `query` under `context`.
    ///
    /// An empty query returns no results without touching the embedder or
    /// the store. An embedder that produces no vector for the query also
    /// returns no results. Both are quiet degradations, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error when the embedder or the vector store fails.
    #[instrument(
        skip(self, query, context),
        fields(query_length = query.len(), scope = %options.scope, limit = options.limit)
    )]
    #[allow(clippy::cast_precision_loss)]
    pub async fn recall(
        &self,
        query: &str,
        context: &QueryContext,
        options: &RecallOptions,
    ) -> Result<Vec<ScoredResult>> {
        let start = Instant::now();
        if query.is_empty() {
            tracing::debug!("empty query, nothing to recall");
            return Ok(Vec::new());
        }

        let Some(embedding) = self.embedder.embed(query).await? else {
            tracing::debug!("query produced no embedding, nothing to recall");
            return Ok(Vec::new());
        };

        let fetch_limit = options.limit.saturating_mul(OVERFETCH_FACTOR);
        let candidates = self.store.search(&embedding, fetch_limit).await?;
        let fetched = candidates.len();

        let mut scored = RelevanceScorer::new().score_all(candidates, context);
        if !options.kinds.is_empty() {
            scored.retain(|item| options.kinds.iter().any(|kind| *kind == item.candidate.kind));
        }
        let mut scored = ScopeFilter::new().apply(options.scope, scored, context);
        scored = dedupe_by_id(scored);
        if let Some(min_score) = options.min_score {
            scored.retain(|item| item.candidate.similarity >= min_score);
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(options.limit);

        let results: Vec<ScoredResult> = scored
            .into_iter()
            .map(|item| ScoredResult::from_candidate(item.candidate, item.score))
            .collect();

        metrics::histogram!("recall_duration_ms", "scope" => options.scope.as_str())
            .record(start.elapsed().as_millis() as f64);
        tracing::debug!(fetched, returned = results.len(), "recall complete");
        Ok(results)
    }

    /// Recalls a small result set describing a project, for injection into
    /// an assistant's ambient context.
    ///
    /// The query is the project identity from `context` when known, the
    /// project path otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when the embedder or the vector store fails.
    #[instrument(skip_all, fields(project_root = %project_root.display()))]
    pub async fn recall_for_context(
        &self,
        project_root: &Path,
        context: &QueryContext,
    ) -> Result<Vec<ScoredResult>> {
        let query = context
            .project_id
            .clone()
            .unwrap_or_else(|| project_root.display().to_string());
        let options = RecallOptions::new().with_limit(CONTEXT_RECALL_LIMIT);
        self.recall(&query, context, &options).await
    }
}
