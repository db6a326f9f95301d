//! State mirrored between peers.
//!
//! Peers trust each other: whatever arrives last wins. These types are the
//! engine-side view; the wire format lives in the net crate.

use serde::{Deserialize, Serialize};

use crate::enums::EnemyArchetype;
use crate::types::Position;

/// One enemy as seen by the peer that owns the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySync {
    /// Stable while the enemy lives on the authority.
    pub id: u64,
    /// None for the boss.
    pub archetype: Option<EnemyArchetype>,
    pub position: Position,
    pub health: f64,
}

/// An update received from another peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PeerUpdate {
    PlayerMoved { player_id: String, position: Position },
    PlayerLeft { player_id: String },
    EnemyState { round: u32, enemies: Vec<EnemySync> },
}
