use super::channel::{BroadcastChannel, PublishFuture, TopicHub};
use super::protocol::{InstanceId, SyncMessage};

use anyhow::Result;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tracing::info;

const PEER_EXCHANGE_INTERVAL: Duration = Duration::from_secs(2);
const PEER_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_DATAGRAM: usize = 65_507;

/// Broadcast channel over UDP between instances that know each other's addresses.
///
/// A node starts from its seed addresses and learns the rest through `Join`/`Peers`
/// exchanges. Every exchange round sends a `Join` to each known peer, which answers with
/// `Peers`; a peer not heard from directly within `PEER_TIMEOUT` is dropped. Publishing
/// delivers to local subscribers and sends one datagram to every known peer; nothing is
/// retried, and lost datagrams heal with the next update for the term.
pub struct UdpBroadcast {
    pub instance: InstanceId,
    local_addr: SocketAddr,
    socket: Arc<UdpSocket>,
    seeds: Vec<SocketAddr>,
    // Last time each peer sent us a frame.
    peers: Arc<DashMap<SocketAddr, Instant>>,
    hub: TopicHub,
}

impl UdpBroadcast {
    pub async fn new(bind_addr: SocketAddr, seed_nodes: Vec<SocketAddr>) -> Result<Arc<Self>> {
        let socket = UdpSocket::bind(bind_addr).await?;
        let local_addr = socket.local_addr()?;
        let instance = InstanceId::new();
        let peers = Arc::new(DashMap::new());

        if !seed_nodes.is_empty() {
            info!("Joining sync group via {} seed node(s)", seed_nodes.len());

            let encoded = bincode::serialize(&SyncMessage::Join {
                instance: instance.clone(),
            })?;
            for seed_node in seed_nodes.iter().filter(|seed| **seed != local_addr) {
                peers.insert(*seed_node, Instant::now());
                socket.send_to(&encoded, seed_node).await?;
                info!("Sent join request to {}", seed_node);
            }
        }

        Ok(Arc::new(Self {
            instance,
            local_addr,
            socket: Arc::new(socket),
            seeds: seed_nodes
                .into_iter()
                .filter(|seed| *seed != local_addr)
                .collect(),
            peers,
            hub: TopicHub::default(),
        }))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn peers(&self) -> Vec<SocketAddr> {
        self.peers.iter().map(|entry| *entry.key()).collect()
    }

    /// Spawns the receive and peer-exchange loops.
    pub async fn start(self: Arc<Self>) {
        tracing::info!("Starting UDP sync transport on {}", self.local_addr);

        let _receive_handle = {
            let transport = self.clone();
            tokio::spawn(async move {
                transport.receive_loop().await;
            })
        };

        let _exchange_handle = {
            let transport = self.clone();
            tokio::spawn(async move {
                transport.peer_exchange_loop().await;
            })
        };
    }

    async fn receive_loop(self: Arc<Self>) {
        let mut buf = vec![0u8; 65536];

        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, src)) => match bincode::deserialize::<SyncMessage>(&buf[..len]) {
                    Ok(msg) => {
                        if let Err(e) = self.handle_message(msg, src).await {
                            tracing::error!("Error handling sync frame from {}: {}", src, e);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to decode sync frame from {}: {}", src, e);
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to receive UDP packet: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }

    async fn handle_message(&self, msg: SyncMessage, src: SocketAddr) -> Result<()> {
        match msg {
            SyncMessage::Join { instance } => {
                tracing::debug!("Join from {:?} at {}", instance, src);
                self.remember(src);

                let reply = SyncMessage::Peers {
                    instance: self.instance.clone(),
                    peers: self.peers(),
                };
                let encoded = bincode::serialize(&reply)?;
                self.socket.send_to(&encoded, src).await?;
            }

            SyncMessage::Peers { instance, peers } => {
                tracing::debug!(
                    "Received {} peer addresses from {:?}",
                    peers.len(),
                    instance
                );
                self.remember(src);
                for peer in peers {
                    self.learn(peer);
                }
            }

            SyncMessage::Publish {
                origin,
                topic,
                payload,
            } => {
                self.remember(src);
                let delivered = self.hub.deliver(&topic, payload);
                tracing::trace!(
                    "Delivered update from {:?} on '{}' to {} subscribers",
                    origin,
                    topic,
                    delivered
                );
            }
        }

        Ok(())
    }

    // Marks `addr` as heard from just now. Returns true if it was not known before.
    fn remember(&self, addr: SocketAddr) -> bool {
        if addr == self.local_addr {
            return false;
        }

        let is_new = self.peers.insert(addr, Instant::now()).is_none();
        if is_new {
            info!("Discovered sync peer at {} ({} known)", addr, self.peers.len());
        }
        is_new
    }

    // Adds an address gossiped by another peer without refreshing one already known, so a
    // departed node cannot be kept alive by peers that still list it.
    fn learn(&self, addr: SocketAddr) {
        if addr == self.local_addr {
            return;
        }

        if let Entry::Vacant(slot) = self.peers.entry(addr) {
            slot.insert(Instant::now());
            info!("Discovered sync peer at {} via gossip", addr);
        }
    }

    /// Drops every peer not heard from within `timeout`, returning how many were dropped.
    pub fn expire_peers(&self, timeout: Duration) -> usize {
        let before = self.peers.len();
        self.peers.retain(|addr, last_seen| {
            let alive = last_seen.elapsed() <= timeout;
            if !alive {
                tracing::warn!(
                    "Sync peer {} silent for {:?}, dropping it",
                    addr,
                    last_seen.elapsed()
                );
            }
            alive
        });
        before.saturating_sub(self.peers.len())
    }

    async fn send_frame(&self, frame: &SyncMessage, target: SocketAddr) {
        match bincode::serialize(frame) {
            Ok(encoded) => {
                if let Err(e) = self.socket.send_to(&encoded, target).await {
                    tracing::warn!("Failed to exchange peers with {}: {}", target, e);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize peer exchange frame: {}", e);
            }
        }
    }

    async fn peer_exchange_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(PEER_EXCHANGE_INTERVAL);

        loop {
            interval.tick().await;

            self.expire_peers(PEER_TIMEOUT);

            let known = self.peers();
            let join = SyncMessage::Join {
                instance: self.instance.clone(),
            };

            if known.is_empty() {
                // Lost every peer: try the seeds again.
                for seed in self.seeds.iter() {
                    self.send_frame(&join, *seed).await;
                }
                continue;
            }

            for peer in known.iter() {
                self.send_frame(&join, *peer).await;
            }

            use rand::Rng;
            let idx = rand::thread_rng().gen_range(0..known.len());
            let target = known[idx];
            let gossip = SyncMessage::Peers {
                instance: self.instance.clone(),
                peers: known.clone(),
            };
            self.send_frame(&gossip, target).await;
        }
    }
}

impl BroadcastChannel for UdpBroadcast {
    fn publish<'a>(&'a self, topic: &'a str, payload: Vec<u8>) -> PublishFuture<'a> {
        Box::pin(async move {
            let frame = SyncMessage::Publish {
                origin: self.instance.clone(),
                topic: topic.to_string(),
                payload: payload.clone(),
            };
            let encoded = bincode::serialize(&frame)?;
            if encoded.len() > MAX_DATAGRAM {
                return Err(anyhow::anyhow!(
                    "Sync frame of {} bytes exceeds the datagram limit",
                    encoded.len()
                ));
            }

            self.hub.deliver(topic, payload);

            let peers = self.peers();
            let mut failed = 0usize;
            for peer in peers.iter() {
                if let Err(e) = self.socket.send_to(&encoded, peer).await {
                    tracing::warn!("Failed to send update to {}: {}", peer, e);
                    failed += 1;
                }
            }

            if failed > 0 {
                return Err(anyhow::anyhow!(
                    "Update reached {} of {} peers",
                    peers.len() - failed,
                    peers.len()
                ));
            }
            Ok(())
        })
    }

    fn subscribe(&self, topic: &str) -> broadcast::Receiver<Vec<u8>> {
        self.hub.subscribe(topic)
    }
}
