//! Durable Term Storage Module
//!
//! The source of truth that outlives a process: one row per normalized term with its
//! usage frequency. The in-memory index is rebuilt from here on startup, and the
//! ordered queries serve as a fallback path that bypasses the index.
//!
//! ## Core Concepts
//! - **Contract**: `TermStore` is synchronous; async callers move calls onto the blocking pool.
//! - **Upsert-increment**: Creating a row with frequency 1, or bumping an existing one, is a
//!   single atomic store operation. Its result is the authoritative post-increment value.
//! - **Ordering**: Ordered reads return frequency descending, term ascending.
//!
//! ## Implementations
//! - **`memory`**: `MemoryTermStore`, a `DashMap` of rows (tests, single-node runs).
//! - **`file`**: `FileTermStore`, a JSON snapshot rewritten atomically on every mutation.

pub mod file;
pub mod memory;
pub mod store;

pub use file::FileTermStore;
pub use memory::MemoryTermStore;
pub use store::{StoreError, TermRecord, TermStore, call_blocking, now_ms, order_by_frequency};

#[cfg(test)]
mod tests;
