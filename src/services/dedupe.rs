//! Duplicate collapse by candidate id.

use super::scoring::ScoredCandidate;
use std::collections::HashMap;

/// Collapses duplicate ids, keeping the best-scored occurrence.
///
/// First-seen order is preserved. A later duplicate replaces the kept entry
/// in place only when its score is strictly greater, so ties keep the
/// earliest occurrence.
#[must_use]
pub fn dedupe_by_id(scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let input_len = scored.len();
    let mut kept: Vec<ScoredCandidate> = Vec::with_capacity(input_len);
    let mut slot_by_id: HashMap<String, usize> = HashMap::with_capacity(input_len);

    for item in scored {
        if let Some(&slot) = slot_by_id.get(item.candidate.id.as_str()) {
            if item.score > kept[slot].score {
                kept[slot] = item;
            }
        } else {
            slot_by_id.insert(item.candidate.id.clone(), kept.len());
            kept.push(item);
        }
    }

    if kept.len() < input_len {
        tracing::debug!(collapsed = input_len - kept.len(), "dropped duplicate ids");
    }
    kept
}
