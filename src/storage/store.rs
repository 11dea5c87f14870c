use crate::index::normalize;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Failure of a durable store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("term store unavailable: {0}")]
    Unavailable(String),
    #[error("term store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("term store data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One durable row.
///
/// Timestamps are milliseconds since the Unix epoch; `last_used` moves on every increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub term: String,
    pub frequency: u64,
    pub created_at: u64,
    pub last_used: u64,
}

impl TermRecord {
    pub fn new(term: &str, frequency: u64) -> Self {
        let now = now_ms();
        Self {
            term: term.to_string(),
            frequency,
            created_at: now,
            last_used: now,
        }
    }
}

/// The durable store as seen by the core.
///
/// Terms handed to the store are already normalized. Any error fails only the calling
/// operation.
pub trait TermStore: Send + Sync {
    fn find_all(&self) -> Result<Vec<TermRecord>, StoreError>;

    fn find_by_term(&self, term: &str) -> Result<Option<TermRecord>, StoreError>;

    /// Creates the row with frequency 1, or increments an existing one, returning the row
    /// as stored.
    fn upsert_increment(&self, term: &str) -> Result<TermRecord, StoreError>;

    /// Creates or replaces a row as given.
    fn save(&self, record: TermRecord) -> Result<TermRecord, StoreError>;

    fn find_all_ordered_by_frequency_desc(&self) -> Result<Vec<TermRecord>, StoreError> {
        let mut records = self.find_all()?;
        order_by_frequency(&mut records);
        Ok(records)
    }

    /// Rows whose term starts with the normalized `prefix`, ordered like
    /// `find_all_ordered_by_frequency_desc`.
    fn find_by_prefix_ordered(&self, prefix: &str) -> Result<Vec<TermRecord>, StoreError> {
        let prefix = normalize(prefix);
        let mut records: Vec<TermRecord> = self
            .find_all()?
            .into_iter()
            .filter(|record| record.term.starts_with(&prefix))
            .collect();
        order_by_frequency(&mut records);
        Ok(records)
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.find_all()?.len())
    }
}

/// Sorts by frequency descending, term ascending.
pub fn order_by_frequency(records: &mut [TermRecord]) {
    records.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.term.cmp(&b.term))
    });
}

/// Runs a store operation on the blocking thread pool.
///
/// Store calls may block on I/O and must never run on an async worker thread.
pub async fn call_blocking<T, F>(store: &Arc<dyn TermStore>, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn TermStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StoreError::Unavailable(format!("store task failed: {}", e)))?
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
