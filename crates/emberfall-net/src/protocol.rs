//! Wire protocol: length-prefixed JSON frames.
//!
//! Every frame is a 4-byte big-endian body length followed by a JSON-encoded
//! `NetMessage`. Frames above `MAX_FRAME_LEN` are rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use emberfall_core::sync::{EnemySync, PeerUpdate};
use emberfall_core::types::Position;

/// Largest accepted frame body (1 MiB).
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A message exchanged between peers through the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NetMessage {
    /// First message of every connection.
    Register {
        player_id: String,
        position: Position,
    },
    Move {
        player_id: String,
        position: Position,
    },
    /// Full state published by the round authority.
    State {
        players: BTreeMap<String, Position>,
        enemies: Vec<EnemySync>,
        round: u32,
    },
    Leave {
        player_id: String,
    },
}

impl NetMessage {
    /// Translate into engine updates, dropping anything about `local_id`.
    pub fn into_peer_updates(self, local_id: &str) -> Vec<PeerUpdate> {
        match self {
            NetMessage::Register {
                player_id,
                position,
            }
            | NetMessage::Move {
                player_id,
                position,
            } => {
                if player_id == local_id {
                    return Vec::new();
                }
                vec![PeerUpdate::PlayerMoved {
                    player_id,
                    position,
                }]
            }
            NetMessage::State {
                players,
                enemies,
                round,
            } => {
                let mut updates: Vec<PeerUpdate> = players
                    .into_iter()
                    .filter(|(player_id, _)| player_id != local_id)
                    .map(|(player_id, position)| PeerUpdate::PlayerMoved {
                        player_id,
                        position,
                    })
                    .collect();
                updates.push(PeerUpdate::EnemyState { round, enemies });
                updates
            }
            NetMessage::Leave { player_id } => {
                if player_id == local_id {
                    return Vec::new();
                }
                vec![PeerUpdate::PlayerLeft { player_id }]
            }
        }
    }
}

pub fn encode_message(message: &NetMessage) -> Result<Vec<u8>, ProtocolError> {
    let body = serde_json::to_vec(message)?;
    if body.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            len: body.len(),
            max: MAX_FRAME_LEN,
        });
    }
    Ok(body)
}

pub fn decode_message(body: &[u8]) -> Result<NetMessage, ProtocolError> {
    Ok(serde_json::from_slice(body)?)
}

/// Write one frame (length prefix plus `body`).
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            len: body.len(),
            max: MAX_FRAME_LEN,
        });
    }
    let len = body.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame body. Returns `None` when the peer closed the stream
/// cleanly between frames.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        });
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

pub async fn write_message<W>(writer: &mut W, message: &NetMessage) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let body = encode_message(message)?;
    write_frame(writer, &body).await
}

pub async fn read_message<R>(reader: &mut R) -> Result<Option<NetMessage>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    match read_frame(reader).await? {
        Some(body) => Ok(Some(decode_message(&body)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_tagged_by_action() {
        let json = serde_json::to_string(&NetMessage::Leave {
            player_id: "p1".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"action":"leave","player_id":"p1"}"#);

        let parsed: NetMessage = serde_json::from_str(
            r#"{"action":"move","player_id":"p2","position":{"x":1.0,"y":2.0}}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            NetMessage::Move {
                player_id: "p2".into(),
                position: Position::new(1.0, 2.0),
            }
        );
    }

    #[test]
    fn test_state_skips_local_player() {
        let mut players = BTreeMap::new();
        players.insert("me".to_string(), Position::new(1.0, 1.0));
        players.insert("you".to_string(), Position::new(2.0, 2.0));
        let updates = NetMessage::State {
            players,
            enemies: Vec::new(),
            round: 3,
        }
        .into_peer_updates("me");

        assert_eq!(
            updates,
            vec![
                PeerUpdate::PlayerMoved {
                    player_id: "you".into(),
                    position: Position::new(2.0, 2.0),
                },
                PeerUpdate::EnemyState {
                    round: 3,
                    enemies: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn test_own_echo_is_ignored() {
        let updates = NetMessage::Move {
            player_id: "me".into(),
            position: Position::default(),
        }
        .into_peer_updates("me");
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_frame_round_trip_over_duplex() {
        let (mut a, mut b) = tokio::io::duplex(64);
        let message = NetMessage::Register {
            player_id: "p1".into(),
            position: Position::new(10.0, 20.0),
        };

        let writer = tokio::spawn(async move {
            write_message(&mut a, &message).await.unwrap();
            message
        });
        let received = read_message(&mut b).await.unwrap();
        let sent = writer.await.unwrap();
        assert_eq!(received, Some(sent));

        // Writer side dropped: clean end of stream.
        assert!(read_message(&mut b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oversize_frame_rejected() {
        let (mut a, mut b) = tokio::io::duplex(64);
        let len = (MAX_FRAME_LEN as u32 + 1).to_be_bytes();
        a.write_all(&len).await.unwrap();

        let err = read_frame(&mut b).await.unwrap_err();
        assert!(matches!(err, ProtocolError::FrameTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let (mut a, mut b) = tokio::io::duplex(64);
        write_frame(&mut a, b"not json").await.unwrap();
        let err = read_message(&mut b).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }
}
