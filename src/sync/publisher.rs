use super::channel::BroadcastChannel;
use super::protocol::UpdateRecord;

use anyhow::Result;
use std::sync::Arc;

/// Sends `UpdateRecord`s on one topic of a shared channel.
#[derive(Clone)]
pub struct UpdatePublisher {
    channel: Arc<dyn BroadcastChannel>,
    topic: String,
}

impl UpdatePublisher {
    pub fn new(channel: Arc<dyn BroadcastChannel>, topic: impl Into<String>) -> Self {
        Self {
            channel,
            topic: topic.into(),
        }
    }

    pub async fn publish(&self, record: &UpdateRecord) -> Result<()> {
        let payload = record.encode()?;
        self.channel.publish(&self.topic, payload).await?;

        tracing::debug!(
            "Published update on '{}': {} -> {}",
            self.topic,
            record.term,
            record.frequency
        );
        Ok(())
    }
}
