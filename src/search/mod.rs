//! Search Service Module
//!
//! Turns "every term under a prefix" into "the K most used terms under a prefix".
//!
//! ## Overview
//! Queries run purely against the local `PrefixIndex` replica; no other instance is
//! consulted, so an instance may briefly lag behind writes made elsewhere.
//!
//! ## Responsibilities
//! - **Ranking**: Frequency descending, then term ascending, so equal frequencies always
//!   come back in the same order.
//! - **Selection**: A bounded heap of size K, never a sort of the whole subtree.
//! - **Clamping**: Caller limits are capped at the configured maximum.
//! - **API**: RESTful handlers for the Axum web server.
//!
//! ## Submodules
//! - **`engine`**: `RankedSuggester`, prefix and global top-K queries.
//! - **`ranking`**: The ordering rule and the bounded `TopK` selector.
//! - **`handlers`**: HTTP request handlers.
//! - **`types`**: Data Transfer Objects (DTOs) for API communication.

pub mod engine;
pub mod handlers;
pub mod ranking;
pub mod types;

#[cfg(test)]
mod tests;
