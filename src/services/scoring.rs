//! Combined relevance scoring.
//!
//! Every candidate gets one score blending three factors, then an optional
//! boost for pinned notes.
//!
//! # Algorithm
//!
//! ```text
//! score(c)   = 0.5 * similarity + 0.25 * recency + 0.25 * affinity
//! recency(c) = exp(-age_days * ln(2) / 7)
//! affinity(c) = 1.0 when the candidate and query agree on the project
//! ```
//!
//! Permanent candidates have the whole sum multiplied by 1.2, so a pinned
//! note with perfect factors reaches at most 1.2. Future-dated timestamps
//! clamp to zero age, which makes their recency exactly 1.0. Similarity is
//! clamped to `[0, 1]` before weighting, so a store reporting negative
//! cosine values cannot pull the combined score below zero.

use crate::current_timestamp_ms;
use crate::models::{QueryContext, RecallCandidate};

/// Weight of raw similarity in the combined score.
const SIMILARITY_WEIGHT: f64 = 0.5;
/// Weight of recency decay in the combined score.
const RECENCY_WEIGHT: f64 = 0.25;
/// Weight of project affinity in the combined score.
const PROJECT_WEIGHT: f64 = 0.25;
/// Multiplier applied to the full score of permanent candidates.
const PERMANENT_BOOST: f64 = 1.2;
/// Days until recency decays to half.
const RECENCY_HALF_LIFE_DAYS: f64 = 7.0;
/// Milliseconds per day, for age conversion.
const MS_PER_DAY: f64 = 86_400_000.0;

/// A candidate paired with its combined score, the unit the pipeline
/// filters and sorts before mapping to the public result shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The underlying candidate.
    pub candidate: RecallCandidate,
    /// Combined relevance score.
    pub score: f64,
}

/// Scores candidates against a query context at a fixed point in time.
///
/// The clock is captured at construction so one recall pass scores every
/// candidate against the same "now".
#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer {
    now_ms: i64,
}

impl RelevanceScorer {
    /// Creates a scorer anchored at the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_ms: current_timestamp_ms(),
        }
    }

    /// Creates a scorer anchored at an explicit epoch-millisecond instant.
    #[must_use]
    pub const fn at(now_ms: i64) -> Self {
        Self { now_ms }
    }

    /// Computes the combined score for one candidate.
    ///
    /// The result is finite and non-negative, at most 1.2.
    #[must_use]
    pub fn score(&self, candidate: &RecallCandidate, context: &QueryContext) -> f64 {
        let similarity = f64::from(candidate.similarity).clamp(0.0, 1.0);
        let recency = self.recency(candidate.timestamp);
        let affinity = if candidate.project == context.project_id {
            1.0
        } else {
            0.0
        };

        let combined = SIMILARITY_WEIGHT.mul_add(
            similarity,
            RECENCY_WEIGHT.mul_add(recency, PROJECT_WEIGHT * affinity),
        );

        if candidate.permanent {
            combined * PERMANENT_BOOST
        } else {
            combined
        }
    }

    /// Scores a batch of candidates, preserving input order.
    #[must_use]
    pub fn score_all(
        &self,
        candidates: Vec<RecallCandidate>,
        context: &QueryContext,
    ) -> Vec<ScoredCandidate> {
        candidates
            .into_iter()
            .map(|candidate| {
                let score = self.score(&candidate, context);
                ScoredCandidate { candidate, score }
            })
            .collect()
    }

    /// Exponential decay of a capture timestamp, 1.0 at the anchor instant,
    /// halving every seven days. Timestamps after the anchor clamp to 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn recency(&self, timestamp_ms: i64) -> f64 {
        let age_days = (self.now_ms - timestamp_ms).max(0) as f64 / MS_PER_DAY;
        (-age_days * std::f64::consts::LN_2 / RECENCY_HALF_LIFE_DAYS).exp()
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new()
    }
}
