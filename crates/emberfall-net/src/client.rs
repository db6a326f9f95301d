//! Relay client.
//!
//! Socket I/O runs on two tokio tasks. Incoming messages are translated into
//! `RelayEvent`s and pushed through a `std::sync::mpsc` channel, so the game
//! thread never touches the socket. When the relay goes away the channel gets
//! a final `RelayEvent::Closed`. Outgoing messages go through an unbounded
//! tokio channel whose `send` does not block.

use std::sync::mpsc as std_mpsc;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use emberfall_core::sync::PeerUpdate;
use emberfall_core::types::Position;

use crate::error::NetError;
use crate::protocol::{self, NetMessage};

/// What the relay reader hands to the game thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    Peer(PeerUpdate),
    /// The connection ended; nothing more will arrive.
    Closed,
}

impl From<PeerUpdate> for RelayEvent {
    fn from(update: PeerUpdate) -> Self {
        RelayEvent::Peer(update)
    }
}

/// Sending half of a relay connection, usable from any thread.
#[derive(Debug, Clone)]
pub struct PeerLink {
    player_id: String,
    outbound: mpsc::UnboundedSender<NetMessage>,
}

impl PeerLink {
    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn send(&self, message: NetMessage) -> Result<(), NetError> {
        self.outbound
            .send(message)
            .map_err(|_| NetError::Closed("relay connection"))
    }
}

pub struct RelayClient;

impl RelayClient {
    /// Connect to the relay at `addr`, register `player_id`, and start
    /// forwarding updates from other peers into `inbound`.
    ///
    /// Must be called inside a tokio runtime; the returned link stays usable
    /// from plain threads.
    pub async fn connect<T>(
        addr: &str,
        player_id: &str,
        position: Position,
        inbound: std_mpsc::Sender<T>,
    ) -> Result<PeerLink, NetError>
    where
        T: From<RelayEvent> + Send + 'static,
    {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| NetError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        let (mut reader, mut writer) = stream.into_split();

        protocol::write_message(
            &mut writer,
            &NetMessage::Register {
                player_id: player_id.to_string(),
                position,
            },
        )
        .await?;
        info!(addr, player_id, "Connected to relay");

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<NetMessage>();
        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                if let Err(e) = protocol::write_message(&mut writer, &message).await {
                    warn!(error = %e, "Send to relay failed");
                    break;
                }
            }
        });

        let local_id = player_id.to_string();
        tokio::spawn(async move {
            loop {
                match protocol::read_message(&mut reader).await {
                    Ok(Some(message)) => {
                        for update in message.into_peer_updates(&local_id) {
                            if inbound.send(T::from(RelayEvent::Peer(update))).is_err() {
                                debug!("Game thread gone, closing relay reader");
                                return;
                            }
                        }
                    }
                    Ok(None) => {
                        info!("Relay closed the connection");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Relay connection lost");
                        break;
                    }
                }
            }
            let _ = inbound.send(T::from(RelayEvent::Closed));
        });

        Ok(PeerLink {
            player_id: player_id.to_string(),
            outbound: outbound_tx,
        })
    }
}
