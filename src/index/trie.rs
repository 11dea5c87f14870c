use super::node::{IndexNode, TermEntry};
use super::normalize::normalize;

use dashmap::DashMap;
use dashmap::mapref::one::MappedRef;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Guard returned by [`PrefixIndex::locate`].
///
/// Dereferences to the node at which the prefix ends and keeps the owning shard
/// read-locked until dropped.
pub type PrefixNode<'a> = MappedRef<'a, char, IndexNode, IndexNode>;

/// Result of applying a replicated frequency to the local index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The local frequency now equals the received one.
    Applied,
    /// The local frequency is already higher; the update was older than what we hold.
    Stale { current: u64 },
    /// The term was blank after normalization.
    Ignored,
}

/// Concurrent prefix tree of normalized terms.
///
/// Root children are sharded by first character. Every operation takes at most one shard
/// lock and releases it before returning, except `locate`, whose guard the caller holds.
/// The term count only changes while the shard holding the term is write-locked.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    roots: DashMap<char, IndexNode>,
    terms: AtomicUsize,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `term` with exactly `frequency`, replacing any previous value.
    ///
    /// Blank input is a no-op and returns `false`.
    pub fn insert(&self, term: &str, frequency: u64) -> bool {
        let normalized = normalize(term);
        let mut chars = normalized.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        let mut root = self.roots.entry(first).or_default();
        if root.descend_or_create(chars).store(&normalized, frequency) {
            self.terms.fetch_add(1, Ordering::Relaxed);
        }

        tracing::trace!("Inserted '{}' with frequency {}", normalized, frequency);
        true
    }

    /// Adds one use of `term`, creating it with frequency 1 if absent.
    ///
    /// Returns the post-increment frequency, or `None` for blank input.
    pub fn increment_frequency(&self, term: &str) -> Option<u64> {
        let normalized = normalize(term);
        let mut chars = normalized.chars();
        let first = chars.next()?;

        let frequency = {
            let mut root = self.roots.entry(first).or_default();
            let (frequency, created) = root.descend_or_create(chars).bump(&normalized);
            if created {
                self.terms.fetch_add(1, Ordering::Relaxed);
            }
            frequency
        };

        tracing::trace!("Frequency of '{}' is now {}", normalized, frequency);
        Some(frequency)
    }

    /// Overwrites the frequency of `term` unless the local value is already higher.
    ///
    /// Frequencies only grow, so a lower incoming value can only come from an update that
    /// was overtaken by a newer one.
    pub fn apply_update(&self, term: &str, frequency: u64) -> UpdateOutcome {
        let normalized = normalize(term);
        let mut chars = normalized.chars();
        let Some(first) = chars.next() else {
            return UpdateOutcome::Ignored;
        };

        let mut root = self.roots.entry(first).or_default();
        let node = root.descend_or_create(chars);

        if let Some(entry) = node.entry()
            && entry.frequency > frequency
        {
            return UpdateOutcome::Stale {
                current: entry.frequency,
            };
        }

        if node.store(&normalized, frequency) {
            self.terms.fetch_add(1, Ordering::Relaxed);
        }
        UpdateOutcome::Applied
    }

    /// Finds the node at which `prefix` ends.
    ///
    /// Returns `None` when the prefix is blank or any of its characters is missing.
    pub fn locate(&self, prefix: &str) -> Option<PrefixNode<'_>> {
        let normalized = normalize(prefix);
        let mut chars = normalized.chars();
        let first = chars.next()?;

        self.roots
            .get(&first)?
            .try_map(|root| root.descend(chars))
            .ok()
    }

    /// Visits every stored term in the index, shard by shard.
    ///
    /// `visit` runs while a shard read guard is held and must not write to this index.
    pub fn for_each_entry<F>(&self, mut visit: F)
    where
        F: FnMut(&TermEntry),
    {
        for shard in self.roots.iter() {
            for entry in shard.value().collect() {
                visit(entry);
            }
        }
    }

    /// All stored terms as owned pairs, in no particular order.
    pub fn entries(&self) -> Vec<TermEntry> {
        let mut entries = Vec::with_capacity(self.len());
        self.for_each_entry(|entry| entries.push(entry.clone()));
        entries
    }

    pub fn contains(&self, term: &str) -> bool {
        self.locate(term)
            .map(|node| node.is_terminal())
            .unwrap_or(false)
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.locate(prefix).is_some()
    }

    pub fn frequency_of(&self, term: &str) -> Option<u64> {
        self.locate(term)
            .and_then(|node| node.entry().map(|entry| entry.frequency))
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.terms.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards every stored term.
    ///
    /// Each shard's terms are uncounted while that shard is write-locked, so a write racing
    /// with `clear` is either removed and uncounted or kept and counted.
    pub fn clear(&self) {
        let mut removed = 0;
        self.roots.retain(|_, root| {
            let terms = root.collect().count();
            self.terms.fetch_sub(terms, Ordering::Relaxed);
            removed += terms;
            false
        });
        tracing::info!("Prefix index cleared, {} terms discarded", removed);
    }
}
