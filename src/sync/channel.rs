use super::protocol::TOPIC_CAPACITY;

use anyhow::Result;
use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Future returned by [`BroadcastChannel::publish`].
pub type PublishFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A shared pub/sub transport.
///
/// `publish` is fire-and-forget and best effort. Subscribers see every payload published on
/// their topic by any instance, including their own, at least once and in no guaranteed
/// order across publishers.
pub trait BroadcastChannel: Send + Sync {
    fn publish<'a>(&'a self, topic: &'a str, payload: Vec<u8>) -> PublishFuture<'a>;

    fn subscribe(&self, topic: &str) -> broadcast::Receiver<Vec<u8>>;
}

/// Per-topic fan-out to local subscribers.
#[derive(Debug)]
pub struct TopicHub {
    capacity: usize,
    topics: DashMap<String, broadcast::Sender<Vec<u8>>>,
}

impl TopicHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            topics: DashMap::new(),
        }
    }

    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<Vec<u8>> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Hands `payload` to every current subscriber of `topic`, returning how many there were.
    pub fn deliver(&self, topic: &str, payload: Vec<u8>) -> usize {
        match self.topics.get(topic) {
            Some(sender) => sender.send(payload).unwrap_or(0),
            None => 0,
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .get(topic)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for TopicHub {
    fn default() -> Self {
        Self::new(TOPIC_CAPACITY)
    }
}

/// In-process pub/sub.
///
/// Every handle cloned from the same `LocalBroadcast` shares one hub, so several service
/// instances in one process behave like processes attached to one pub/sub server.
#[derive(Debug, Clone, Default)]
pub struct LocalBroadcast {
    hub: Arc<TopicHub>,
}

impl LocalBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hub: Arc::new(TopicHub::new(capacity)),
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.hub.subscriber_count(topic)
    }
}

impl BroadcastChannel for LocalBroadcast {
    fn publish<'a>(&'a self, topic: &'a str, payload: Vec<u8>) -> PublishFuture<'a> {
        Box::pin(async move {
            let delivered = self.hub.deliver(topic, payload);
            tracing::trace!("Delivered payload on '{}' to {} subscribers", topic, delivered);
            Ok(())
        })
    }

    fn subscribe(&self, topic: &str) -> broadcast::Receiver<Vec<u8>> {
        self.hub.subscribe(topic)
    }
}
