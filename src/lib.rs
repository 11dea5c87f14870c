//! Distributed Autocomplete Library
//!
//! Prefix suggestions ranked by usage frequency, served from an in-memory index that every
//! instance keeps locally and that converges across instances through broadcast updates.
//!
//! ## Architecture Modules
//!
//! - **`index`**: The prefix tree. Insertion, frequency increment, monotonic apply of
//!   replicated values, and lazy collection of a prefix's subtree.
//! - **`search`**: Top-K ranking (frequency descending, term ascending), the suggestion
//!   engine, and the HTTP handlers.
//! - **`sync`**: The update record, the broadcast channel seam, an in-process hub and a UDP
//!   peer transport, and the publisher/subscriber pair.
//! - **`storage`**: The durable store contract with in-memory and JSON-file implementations.
//! - **`service`**: The orchestrator for reads and write-through writes, and the bootstrapper
//!   that loads the index before readers see it.
//! - **`config`**: Command-line and environment settings.

pub mod config;
pub mod index;
pub mod search;
pub mod service;
pub mod storage;
pub mod sync;
