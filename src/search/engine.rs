use super::ranking::TopK;
use super::types::Suggestion;
use crate::index::PrefixIndex;

use std::sync::Arc;

/// Default cap on the number of suggestions returned for a prefix.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;

/// Read side of the service: top-K queries over the local index.
#[derive(Debug, Clone)]
pub struct RankedSuggester {
    index: Arc<PrefixIndex>,
    max_suggestions: usize,
}

impl RankedSuggester {
    pub fn new(index: Arc<PrefixIndex>, max_suggestions: usize) -> Self {
        Self {
            index,
            max_suggestions,
        }
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    /// The best `limit` terms starting with `prefix`, clamped to `max_suggestions`.
    ///
    /// A blank prefix, a zero limit or an unknown prefix all yield an empty list.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        let limit = limit.min(self.max_suggestions);
        if limit == 0 {
            return Vec::new();
        }

        let Some(node) = self.index.locate(prefix) else {
            tracing::debug!("No suggestions for prefix '{}'", prefix.trim());
            return Vec::new();
        };

        let mut top = TopK::new(limit);
        for entry in node.collect() {
            top.offer(&entry.term, entry.frequency);
        }
        drop(node);

        let suggestions = top.into_sorted_vec();
        tracing::debug!(
            "Found {} suggestions for prefix '{}'",
            suggestions.len(),
            prefix.trim()
        );
        suggestions
    }

    /// The best `limit` terms in the whole index. Not clamped.
    pub fn top_global(&self, limit: usize) -> Vec<Suggestion> {
        if limit == 0 {
            return Vec::new();
        }

        let mut top = TopK::new(limit);
        self.index
            .for_each_entry(|entry| top.offer(&entry.term, entry.frequency));
        top.into_sorted_vec()
    }
}
