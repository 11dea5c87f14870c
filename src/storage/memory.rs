use super::store::{StoreError, TermRecord, TermStore, now_ms};

use dashmap::DashMap;

/// Rows kept in a concurrent map, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTermStore {
    rows: DashMap<String, TermRecord>,
}

impl MemoryTermStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TermRecord>,
    {
        let rows = DashMap::new();
        for record in records {
            rows.insert(record.term.clone(), record);
        }
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TermStore for MemoryTermStore {
    fn find_all(&self) -> Result<Vec<TermRecord>, StoreError> {
        Ok(self
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn find_by_term(&self, term: &str) -> Result<Option<TermRecord>, StoreError> {
        Ok(self.rows.get(term).map(|row| row.value().clone()))
    }

    fn upsert_increment(&self, term: &str) -> Result<TermRecord, StoreError> {
        let mut row = self
            .rows
            .entry(term.to_string())
            .or_insert_with(|| TermRecord::new(term, 0));
        row.frequency = row.frequency.saturating_add(1);
        row.last_used = now_ms();
        Ok(row.clone())
    }

    fn save(&self, record: TermRecord) -> Result<TermRecord, StoreError> {
        self.rows.insert(record.term.clone(), record.clone());
        Ok(record)
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.rows.len())
    }
}
