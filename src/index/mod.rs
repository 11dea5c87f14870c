//! Prefix Index Module
//!
//! The in-memory, character-keyed tree that every suggestion query runs against.
//! One `PrefixIndex` lives in each service instance; it knows nothing about networking
//! or persistence.
//!
//! ## Core Concepts
//! - **Normalization**: Every term and prefix is trimmed and lower-cased before any traversal,
//!   so the tree never holds two terminal nodes for the same normalized term.
//! - **Sharding**: The root's children are kept in a `DashMap` keyed by first character.
//!   Writers to different first characters never block each other, and a reader holds the
//!   shard's read guard for as long as it walks the subtree.
//! - **Two write paths**: `insert` overwrites a frequency (bulk load), `increment_frequency`
//!   adds one (local write). `apply_update` is the overwrite used for replicated updates and
//!   refuses to move a frequency backwards.
//!
//! ## Submodules
//! - **`node`**: `IndexNode`, the stored `TermEntry`, and the lazy subtree walk (`Collect`).
//! - **`normalize`**: Input normalization shared by the index and the service layer.
//! - **`trie`**: `PrefixIndex` and its locking discipline.

pub mod node;
pub mod normalize;
pub mod trie;

pub use node::{Collect, IndexNode, TermEntry};
pub use normalize::normalize;
pub use trie::{PrefixIndex, UpdateOutcome};
