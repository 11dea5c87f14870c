use crate::index::TermEntry;
use serde::{Deserialize, Serialize};

/// A `{term, frequency}` pair as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub term: String,
    pub frequency: u64,
}

impl Suggestion {
    pub fn new(term: &str, frequency: u64) -> Self {
        Self {
            term: term.to_string(),
            frequency,
        }
    }
}

impl From<&TermEntry> for Suggestion {
    fn from(entry: &TermEntry) -> Self {
        Self::new(&entry.term, entry.frequency)
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub prefix: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub prefix: String,
    pub suggestions: Vec<Suggestion>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTermRequest {
    pub term: String,
}

/// Body returned when a write fails.
///
/// `partially_durable` is set when the local index took the write but the durable store did not.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub partially_durable: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InitResponse {
    pub seeded: usize,
    pub message: String,
}

/// Converts a caller-supplied limit, treating negatives as zero.
pub fn limit_from(raw: Option<i64>, default: usize) -> usize {
    match raw {
        Some(value) if value <= 0 => 0,
        Some(value) => usize::try_from(value).unwrap_or(usize::MAX),
        None => default,
    }
}
