use clap::Parser;
use distributed_autocomplete::config::Settings;
use distributed_autocomplete::index::PrefixIndex;
use distributed_autocomplete::search::handlers::router;
use distributed_autocomplete::service::{AutocompleteService, Bootstrapper};
use distributed_autocomplete::storage::{FileTermStore, MemoryTermStore, TermStore};
use distributed_autocomplete::sync::{BroadcastChannel, UdpBroadcast, UpdatePublisher};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level)
        .init();

    tracing::info!("Starting autocomplete node, sync on {}", settings.bind);
    if !settings.seeds.is_empty() {
        tracing::info!("Seed nodes: {:?}", settings.seeds);
    } else {
        tracing::info!("Starting as the first node of the sync group");
    }

    // 1. Durable store:
    let store: Arc<dyn TermStore> = match &settings.data_file {
        Some(path) => Arc::new(FileTermStore::open(path)?),
        None => {
            tracing::warn!("No data file configured, terms are kept in memory only");
            Arc::new(MemoryTermStore::new())
        }
    };

    // 2. Sync transport (UDP):
    let transport = UdpBroadcast::new(settings.bind, settings.seeds.clone()).await?;
    tracing::info!("Instance ID: {:?}", transport.instance);
    transport.clone().start().await;
    let channel: Arc<dyn BroadcastChannel> = transport.clone();

    // 3. Prefix index, loaded before anything reads it:
    let index = Arc::new(PrefixIndex::new());
    let _subscriber = Bootstrapper::new(store.clone())
        .start(index.clone(), channel.as_ref(), &settings.topic)
        .await?;

    // 4. Service:
    let publisher = UpdatePublisher::new(channel, settings.topic.clone());
    let service = Arc::new(AutocompleteService::new(
        index.clone(),
        store,
        publisher,
        settings.max_suggestions,
    ));

    if settings.sample_data {
        let seeded = service.seed_sample_data().await?;
        tracing::info!("Seeded {} sample terms", seeded);
    }

    // 5. Spawn stats reporter:
    let stats_transport = transport.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30));

        loop {
            interval.tick().await;
            tracing::info!(
                "Index stats: {} terms, {} sync peers",
                index.len(),
                stats_transport.peers().len()
            );
        }
    });

    // 6. Start HTTP server:
    let http_addr = settings.http_addr();
    tracing::info!("HTTP server listening on {}", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    axum::serve(listener, router(service)).await?;

    Ok(())
}
