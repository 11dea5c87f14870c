use super::channel::BroadcastChannel;
use super::protocol::UpdateRecord;
use crate::index::{PrefixIndex, UpdateOutcome};

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Applies every `UpdateRecord` received on a topic to the local index.
///
/// The subscription exists from construction on, so payloads published before `run` starts
/// are buffered (up to the topic capacity) rather than missed.
pub struct UpdateSubscriber {
    index: Arc<PrefixIndex>,
    receiver: broadcast::Receiver<Vec<u8>>,
    topic: String,
}

impl UpdateSubscriber {
    pub fn subscribe(index: Arc<PrefixIndex>, channel: &dyn BroadcastChannel, topic: &str) -> Self {
        Self {
            index,
            receiver: channel.subscribe(topic),
            topic: topic.to_string(),
        }
    }

    /// Decodes one payload and applies it.
    pub fn apply(&self, payload: &[u8]) -> Result<UpdateOutcome> {
        let record = UpdateRecord::decode(payload)?;
        let outcome = self.index.apply_update(&record.term, record.frequency);

        match outcome {
            UpdateOutcome::Applied => {
                tracing::debug!("Applied update: {} -> {}", record.term, record.frequency);
            }
            UpdateOutcome::Stale { current } => {
                tracing::debug!(
                    "Skipped stale update for '{}': received {}, holding {}",
                    record.term,
                    record.frequency,
                    current
                );
            }
            UpdateOutcome::Ignored => {
                tracing::debug!("Ignored update with a blank term");
            }
        }

        Ok(outcome)
    }

    /// Receives and applies updates until the channel is closed.
    ///
    /// A payload that fails to decode is logged and skipped. Falling behind the topic
    /// buffer drops the oldest payloads; later updates for those terms repair them.
    pub async fn run(mut self) {
        tracing::info!("Listening for index updates on '{}'", self.topic);

        loop {
            match self.receiver.recv().await {
                Ok(payload) => {
                    if let Err(e) = self.apply(&payload) {
                        tracing::warn!("Skipping malformed update on '{}': {}", self.topic, e);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Subscriber on '{}' fell behind, {} updates dropped",
                        self.topic,
                        skipped
                    );
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Update channel '{}' closed, subscriber stopping", self.topic);
                    break;
                }
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
