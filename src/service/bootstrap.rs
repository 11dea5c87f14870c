use crate::index::PrefixIndex;
use crate::storage::{StoreError, TermStore, call_blocking};
use crate::sync::{BroadcastChannel, UpdateSubscriber};

use std::sync::Arc;
use tokio::task::JoinHandle;

/// Fills a prefix index from the durable store before it is exposed to readers.
pub struct Bootstrapper {
    store: Arc<dyn TermStore>,
}

impl Bootstrapper {
    pub fn new(store: Arc<dyn TermStore>) -> Self {
        Self { store }
    }

    /// Inserts every durable row into `index`, overwriting frequencies.
    ///
    /// Returns the number of rows loaded; blank rows are skipped.
    pub fn load_into(&self, index: &PrefixIndex) -> Result<usize, StoreError> {
        load_records(self.store.as_ref(), index)
    }

    /// Builds a fresh, fully loaded index.
    pub fn build(&self) -> Result<Arc<PrefixIndex>, StoreError> {
        let index = Arc::new(PrefixIndex::new());
        self.load_into(&index)?;
        Ok(index)
    }

    /// Subscribes to `topic`, loads the store into `index`, then spawns the subscriber loop.
    ///
    /// Updates published while the load runs are held by the subscription and applied
    /// afterwards, so none are lost. A buffered update older than a loaded row is rejected as
    /// stale rather than moving the frequency back.
    pub async fn start(
        &self,
        index: Arc<PrefixIndex>,
        channel: &dyn BroadcastChannel,
        topic: &str,
    ) -> Result<JoinHandle<()>, StoreError> {
        let subscriber = UpdateSubscriber::subscribe(index.clone(), channel, topic);

        call_blocking(&self.store, move |store| load_records(store, &index)).await?;

        Ok(subscriber.spawn())
    }
}

fn load_records(store: &dyn TermStore, index: &PrefixIndex) -> Result<usize, StoreError> {
    tracing::info!("Initializing prefix index from the durable store");

    let records = store.find_all()?;
    let mut loaded = 0;
    for record in records.iter() {
        if index.insert(&record.term, record.frequency) {
            loaded += 1;
        } else {
            tracing::warn!("Skipping blank term in the durable store");
        }
    }

    tracing::info!("Prefix index initialized with {} terms", loaded);
    Ok(loaded)
}
