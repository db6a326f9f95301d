//! Broadcast relay server.
//!
//! Each peer gets a task reading its frames and an outbound queue drained by
//! a writer task. Every valid frame is fanned out verbatim to all other
//! registered peers. There is no ordering or reconciliation beyond arrival
//! order.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::error::NetError;
use crate::protocol::{self, NetMessage, ProtocolError};

pub type ConnId = u64;

/// A frame body shared by every outbound queue it is pushed to.
type Frame = Arc<Vec<u8>>;

/// Frames buffered per peer before new ones are dropped.
const OUTBOUND_CAPACITY: usize = 256;

/// Registry of connected peers and their outbound queues.
#[derive(Clone, Default)]
pub struct PeerRegistry {
    inner: Arc<Mutex<HashMap<ConnId, mpsc::Sender<Frame>>>>,
}

impl PeerRegistry {
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    async fn insert(&self, id: ConnId, tx: mpsc::Sender<Frame>) {
        self.inner.lock().await.insert(id, tx);
    }

    async fn remove(&self, id: ConnId) {
        self.inner.lock().await.remove(&id);
    }

    /// Queue `frame` for every peer except `from`. A peer whose queue is full
    /// misses this frame.
    async fn broadcast(&self, from: ConnId, frame: Frame) {
        let peers = self.inner.lock().await;
        for (id, tx) in peers.iter() {
            if *id == from {
                continue;
            }
            if tx.try_send(Arc::clone(&frame)).is_err() {
                warn!(conn = id, "Outbound queue full or closed, frame dropped");
            }
        }
    }
}

pub struct RelayServer {
    listener: TcpListener,
    peers: PeerRegistry,
    next_id: AtomicU64,
}

impl RelayServer {
    pub async fn bind(addr: &str) -> Result<Self, NetError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| NetError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self {
            listener,
            peers: PeerRegistry::default(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetError> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle to the live peer registry.
    pub fn peers(&self) -> PeerRegistry {
        self.peers.clone()
    }

    /// Accept connections forever.
    pub async fn run(self) -> Result<(), NetError> {
        info!(addr = %self.local_addr()?, "Relay listening");
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let peers = self.peers.clone();
                    tokio::spawn(async move {
                        handle_connection(stream, addr, id, peers).await;
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                }
            }
        }
    }
}

async fn handle_connection(stream: TcpStream, addr: SocketAddr, id: ConnId, peers: PeerRegistry) {
    let (mut reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::channel::<Frame>(OUTBOUND_CAPACITY);
    peers.insert(id, tx).await;
    info!(conn = id, %addr, "Peer connected");

    let writer_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = protocol::write_frame(&mut writer, &frame).await {
                debug!(conn = id, error = %e, "Write to peer failed");
                break;
            }
        }
    });

    let mut player_id: Option<String> = None;
    let result = relay_frames(&mut reader, id, &peers, &mut player_id).await;
    peers.remove(id).await;
    writer_task.abort();

    match result {
        Ok(()) => info!(conn = id, %addr, "Peer disconnected"),
        Err(e) => warn!(conn = id, %addr, error = %e, "Peer dropped"),
    }

    // Tell the others the player is gone.
    if let Some(player_id) = player_id {
        match protocol::encode_message(&NetMessage::Leave { player_id }) {
            Ok(body) => peers.broadcast(id, Arc::new(body)).await,
            Err(e) => warn!(conn = id, error = %e, "Failed to encode leave message"),
        }
    }
}

/// Relay frames from one peer until it disconnects or sends garbage.
async fn relay_frames(
    reader: &mut OwnedReadHalf,
    id: ConnId,
    peers: &PeerRegistry,
    player_id: &mut Option<String>,
) -> Result<(), ProtocolError> {
    while let Some(body) = protocol::read_frame(reader).await? {
        let message = protocol::decode_message(&body)?;
        if let NetMessage::Register { player_id: pid, .. } = &message {
            debug!(conn = id, player_id = %pid, "Peer registered");
            *player_id = Some(pid.clone());
        }
        peers.broadcast(id, Arc::new(body)).await;
    }
    Ok(())
}
