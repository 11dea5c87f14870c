use crate::storage::StoreError;

/// Failure of a local write.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The local index counted the use but the durable store did not record it.
    #[error(
        "term '{term}' was counted locally (frequency {local_frequency}) but not persisted: {source}"
    )]
    PartiallyDurable {
        term: String,
        local_frequency: u64,
        source: StoreError,
    },
}

impl SaveError {
    pub fn is_partially_durable(&self) -> bool {
        matches!(self, SaveError::PartiallyDurable { .. })
    }
}
