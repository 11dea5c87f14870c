use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A complete stored term and its usage frequency.
///
/// Only terminal nodes carry one. `term` is always the normalized spelling of the path
/// from the root to the node holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub frequency: u64,
}

/// One node per distinct character reached along some inserted term.
///
/// Children are owned exclusively by their parent. Nodes are never removed individually;
/// a pass-through node becomes terminal when the term ending at it is stored.
#[derive(Debug, Default)]
pub struct IndexNode {
    children: HashMap<char, IndexNode>,
    entry: Option<TermEntry>,
}

impl IndexNode {
    pub fn is_terminal(&self) -> bool {
        self.entry.is_some()
    }

    pub fn entry(&self) -> Option<&TermEntry> {
        self.entry.as_ref()
    }

    /// Follows `path` one character at a time, returning `None` as soon as a character
    /// has no child.
    pub fn descend<I>(&self, path: I) -> Option<&IndexNode>
    where
        I: IntoIterator<Item = char>,
    {
        let mut current = self;
        for c in path {
            current = current.children.get(&c)?;
        }
        Some(current)
    }

    pub(crate) fn descend_or_create<I>(&mut self, path: I) -> &mut IndexNode
    where
        I: IntoIterator<Item = char>,
    {
        let mut current = self;
        for c in path {
            current = current.children.entry(c).or_default();
        }
        current
    }

    /// Marks the node terminal with `term` and overwrites its frequency.
    /// Returns `true` if the node was not terminal before.
    pub(crate) fn store(&mut self, term: &str, frequency: u64) -> bool {
        match self.entry.as_mut() {
            Some(entry) => {
                entry.frequency = frequency;
                false
            }
            None => {
                self.entry = Some(TermEntry {
                    term: term.to_string(),
                    frequency,
                });
                true
            }
        }
    }

    /// Adds one to the frequency, making the node terminal with frequency 1 if needed.
    /// Returns the new frequency and whether the term is new.
    pub(crate) fn bump(&mut self, term: &str) -> (u64, bool) {
        match self.entry.as_mut() {
            Some(entry) => {
                entry.frequency = entry.frequency.saturating_add(1);
                (entry.frequency, false)
            }
            None => {
                self.entry = Some(TermEntry {
                    term: term.to_string(),
                    frequency: 1,
                });
                (1, true)
            }
        }
    }

    /// Every stored term in the subtree rooted at this node, this node included.
    ///
    /// The walk is lazy and depth-first; the order among siblings is unspecified.
    /// Calling `collect` again starts a fresh walk.
    pub fn collect(&self) -> Collect<'_> {
        Collect { stack: vec![self] }
    }
}

/// Iterator returned by [`IndexNode::collect`].
pub struct Collect<'a> {
    stack: Vec<&'a IndexNode>,
}

impl<'a> Iterator for Collect<'a> {
    type Item = &'a TermEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children.values());
            if let Some(entry) = node.entry.as_ref() {
                return Some(entry);
            }
        }
        None
    }
}
