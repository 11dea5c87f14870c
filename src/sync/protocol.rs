//! Synchronization Wire Protocol
//!
//! Two layers:
//! - `UpdateRecord`, the only payload the index contract exposes, serialized as JSON
//!   (`{"term": ..., "frequency": ...}`).
//! - `SyncMessage`, the frame exchanged between UDP peers, serialized with bincode. A
//!   `Publish` frame carries an opaque payload for a named topic.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Topic that index updates are published on unless configured otherwise.
pub const DEFAULT_TOPIC: &str = "prefix-index-updates";

/// How many undelivered payloads a topic buffers per subscriber before it starts dropping.
pub const TOPIC_CAPACITY: usize = 1024;

/// The unit of cross-instance propagation: a term and its absolute frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub term: String,
    pub frequency: u64,
}

impl UpdateRecord {
    pub fn new(term: impl Into<String>, frequency: u64) -> Self {
        Self {
            term: term.into(),
            frequency,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Identity of a running instance, used to tag frames in logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct InstanceId(pub String);

impl InstanceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames exchanged between UDP peers.
///
/// - `Join`: Sent to seeds on startup and periodically to a random peer; answered with `Peers`.
/// - `Peers`: The sender's known peer addresses, merged by the receiver.
/// - `Publish`: A payload for every subscriber of `topic` on the receiving instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SyncMessage {
    Join {
        instance: InstanceId,
    },

    Peers {
        instance: InstanceId,
        peers: Vec<SocketAddr>,
    },

    Publish {
        origin: InstanceId,
        topic: String,
        payload: Vec<u8>,
    },
}
