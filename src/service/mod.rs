//! Autocomplete Service Module
//!
//! Thin orchestration over the index, the durable store and the sync channel.
//!
//! ## Write Path (`save_term`)
//! 1. Normalize; blank input is a no-op.
//! 2. Increment the local index. The shard lock is released before any I/O starts, and local
//!    reads see the new count at once.
//! 3. Upsert-increment the durable row on the blocking pool. A failure here is reported as
//!    `SaveError::PartiallyDurable`: the local index has already changed.
//! 4. Overwrite the local frequency with the durable post-increment value, then publish it.
//!    A publish failure is logged, never returned.
//!
//! Nothing makes steps 2 and 3 atomic. A crash or store failure in between leaves the local
//! index ahead of the store until the next successful write of that term, whose overwrite in
//! step 4 brings this replica back to the durable count.
//!
//! ## Startup (`Bootstrapper`)
//! Subscribe to updates, load every durable row into a fresh index, then start applying
//! the buffered and live updates.

pub mod autocomplete;
pub mod bootstrap;
pub mod error;

pub use autocomplete::{AutocompleteService, SAMPLE_TERMS};
pub use bootstrap::Bootstrapper;
pub use error::SaveError;
