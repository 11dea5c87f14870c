use super::error::SaveError;
use crate::index::{PrefixIndex, normalize};
use crate::search::engine::RankedSuggester;
use crate::search::types::Suggestion;
use crate::storage::{StoreError, TermRecord, TermStore, call_blocking};
use crate::sync::{UpdatePublisher, UpdateRecord};

use std::sync::Arc;

/// Terms written by `seed_sample_data`, most frequent first.
pub const SAMPLE_TERMS: [&str; 23] = [
    "javascript",
    "java",
    "python",
    "react",
    "angular",
    "vue",
    "typescript",
    "spring",
    "django",
    "flask",
    "nodejs",
    "express",
    "mongodb",
    "postgresql",
    "mysql",
    "redis",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "google cloud",
    "spring boot",
    "react native",
];

/// One instance's autocomplete service: local reads, write-through writes.
pub struct AutocompleteService {
    index: Arc<PrefixIndex>,
    suggester: RankedSuggester,
    store: Arc<dyn TermStore>,
    publisher: UpdatePublisher,
}

impl AutocompleteService {
    pub fn new(
        index: Arc<PrefixIndex>,
        store: Arc<dyn TermStore>,
        publisher: UpdatePublisher,
        max_suggestions: usize,
    ) -> Self {
        Self {
            suggester: RankedSuggester::new(index.clone(), max_suggestions),
            index,
            store,
            publisher,
        }
    }

    pub fn index(&self) -> &Arc<PrefixIndex> {
        &self.index
    }

    pub fn max_suggestions(&self) -> usize {
        self.suggester.max_suggestions()
    }

    /// Ranked suggestions from the local replica only.
    pub fn get_suggestions(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        tracing::debug!("Suggestions requested for '{}' (limit {})", prefix, limit);
        self.suggester.suggest(prefix, limit)
    }

    /// Globally most used terms in the local replica.
    pub fn top_terms(&self, limit: usize) -> Vec<Suggestion> {
        self.suggester.top_global(limit)
    }

    /// Same as `top_terms`, read from the durable store instead of the index.
    pub async fn top_terms_durable(&self, limit: usize) -> Result<Vec<Suggestion>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let records =
            call_blocking(&self.store, |store| store.find_all_ordered_by_frequency_desc()).await?;
        Ok(to_suggestions(records, limit))
    }

    /// Same as `get_suggestions`, read from the durable store instead of the index.
    pub async fn suggestions_durable(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, StoreError> {
        let prefix = normalize(prefix);
        let limit = limit.min(self.suggester.max_suggestions());
        if prefix.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let records =
            call_blocking(&self.store, move |store| store.find_by_prefix_ordered(&prefix)).await?;
        Ok(to_suggestions(records, limit))
    }

    /// Records one use of `term`.
    ///
    /// Returns the durable row, or `None` when the term is blank.
    pub async fn save_term(&self, term: &str) -> Result<Option<TermRecord>, SaveError> {
        let normalized = normalize(term);
        let Some(local_frequency) = self.index.increment_frequency(&normalized) else {
            tracing::debug!("Ignoring blank term");
            return Ok(None);
        };
        tracing::debug!("Counted '{}' locally, frequency {}", normalized, local_frequency);

        let record = {
            let term = normalized.clone();
            call_blocking(&self.store, move |store| store.upsert_increment(&term)).await
        }
        .map_err(|source| {
            tracing::error!("Failed to persist term '{}': {}", normalized, source);
            SaveError::PartiallyDurable {
                term: normalized.clone(),
                local_frequency,
                source,
            }
        })?;

        // The durable count is authoritative for this write, whether the replica was behind
        // it or ahead of it after an earlier partially durable write.
        self.index.insert(&record.term, record.frequency);

        let update = UpdateRecord::new(record.term.clone(), record.frequency);
        if let Err(e) = self.publisher.publish(&update).await {
            tracing::warn!(
                "Failed to publish update for '{}' (local index already updated): {}",
                update.term,
                e
            );
        }

        tracing::info!("Saved term '{}' with frequency {}", record.term, record.frequency);
        Ok(Some(record))
    }

    /// Writes `SAMPLE_TERMS` when the store is empty, returning how many were written.
    pub async fn seed_sample_data(&self) -> Result<usize, StoreError> {
        let existing = call_blocking(&self.store, |store| store.count()).await?;
        if existing > 0 {
            tracing::info!("Store already holds {} terms, skipping sample data", existing);
            return Ok(0);
        }

        tracing::info!("Seeding sample data");
        let total = SAMPLE_TERMS.len();
        for (i, term) in SAMPLE_TERMS.into_iter().enumerate() {
            let frequency = ((total - i) * 100) as u64;
            let record = call_blocking(&self.store, move |store| {
                store.save(TermRecord::new(term, frequency))
            })
            .await?;

            self.index.insert(&record.term, record.frequency);
            let update = UpdateRecord::new(record.term, record.frequency);
            if let Err(e) = self.publisher.publish(&update).await {
                tracing::warn!("Failed to publish sample term '{}': {}", update.term, e);
            }
        }

        tracing::info!("Sample data seeded with {} terms", total);
        Ok(total)
    }
}

fn to_suggestions(records: Vec<TermRecord>, limit: usize) -> Vec<Suggestion> {
    records
        .into_iter()
        .take(limit)
        .map(|record| Suggestion {
            term: record.term,
            frequency: record.frequency,
        })
        .collect()
}
