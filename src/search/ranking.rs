use super::types::Suggestion;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Ranking order: higher frequency first, then lexicographically smaller term first.
///
/// `Ordering::Less` means `a` is ranked ahead of `b`.
pub fn rank_order(a: &Suggestion, b: &Suggestion) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then_with(|| a.term.cmp(&b.term))
}

fn ranks_ahead(term: &str, frequency: u64, other: &Suggestion) -> bool {
    match frequency.cmp(&other.frequency) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => term < other.term.as_str(),
    }
}

// Max-heap under `rank_order`, so the top of the heap is the worst entry kept.
#[derive(Debug, PartialEq, Eq)]
struct Candidate(Suggestion);

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_order(&self.0, &other.0)
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the `limit` best-ranked terms out of everything offered to it.
///
/// Offering n terms costs O(n log limit); a term is only cloned when it enters the heap.
#[derive(Debug)]
pub struct TopK {
    limit: usize,
    heap: BinaryHeap<Candidate>,
}

impl TopK {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            heap: BinaryHeap::with_capacity(limit.min(1024) + 1),
        }
    }

    pub fn offer(&mut self, term: &str, frequency: u64) {
        if self.limit == 0 {
            return;
        }

        if self.heap.len() < self.limit {
            self.heap.push(Candidate(Suggestion::new(term, frequency)));
            return;
        }

        let replace = self
            .heap
            .peek()
            .map(|worst| ranks_ahead(term, frequency, &worst.0))
            .unwrap_or(false);

        if replace {
            self.heap.pop();
            self.heap.push(Candidate(Suggestion::new(term, frequency)));
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The kept terms, best first.
    pub fn into_sorted_vec(self) -> Vec<Suggestion> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| candidate.0)
            .collect()
    }
}
