//! Index Synchronization Module
//!
//! Keeps the `PrefixIndex` replicas of independently running instances converging without
//! a shared in-memory store. There is no arbiter: each local write is broadcast as an
//! absolute frequency, and every instance (the writer included) applies what it receives.
//!
//! ## Core Mechanisms
//! - **Absolute values**: An `UpdateRecord` carries the post-increment frequency, never a
//!   delta, so duplicate delivery is harmless.
//! - **Monotonic apply**: Frequencies only grow, so a received value lower than the local one
//!   is an overtaken update and is skipped. Reordering therefore cannot move a term backwards.
//! - **Best effort**: Publish failures are logged by the caller and never undo a local write.
//!   A bad payload is logged and skipped; the subscriber loop keeps running.
//!
//! ## Submodules
//! - **`protocol`**: `UpdateRecord` (JSON payload) and the UDP frame `SyncMessage` (bincode).
//! - **`channel`**: The `BroadcastChannel` seam, the per-topic `TopicHub`, and `LocalBroadcast`.
//! - **`udp`**: `UdpBroadcast`, peer-to-peer fan-out with seed-based discovery.
//! - **`publisher`** / **`subscriber`**: Encode-and-send, and receive-decode-apply.

pub mod channel;
pub mod protocol;
pub mod publisher;
pub mod subscriber;
pub mod udp;

pub use channel::{BroadcastChannel, LocalBroadcast, PublishFuture, TopicHub};
pub use protocol::{DEFAULT_TOPIC, InstanceId, SyncMessage, UpdateRecord};
pub use publisher::UpdatePublisher;
pub use subscriber::UpdateSubscriber;
pub use udp::UdpBroadcast;
