//! Game state snapshot: the complete visible state produced after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::items::Item;
use crate::types::{Position, SimTime};

/// Complete game state produced by the engine after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub round: u32,
    pub player: Option<PlayerView>,
    pub remote_players: Vec<RemotePlayerView>,
    pub enemies: Vec<EnemyView>,
    pub ground_items: Vec<GroundItemView>,
    pub npc: Option<NpcView>,
    pub events: Vec<GameEvent>,
    pub score: ScoreView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub gold: u32,
    pub inventory: Vec<Item>,
    pub stunned: bool,
    pub defending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePlayerView {
    pub player_id: String,
    pub position: Position,
}

/// A live enemy. `archetype` is None and `boss_state` is set for the boss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub archetype: Option<EnemyArchetype>,
    pub boss_state: Option<BossState>,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub frozen: bool,
    /// False while the boss is still in its spawn delay.
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundItemView {
    pub item: Item,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcView {
    pub name: String,
    pub position: Position,
    /// The line on screen while interacting.
    pub line: Option<String>,
    pub interacting: bool,
    pub finished: bool,
    pub player_near: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub rounds_cleared: u32,
    pub kills: u32,
    pub level: u32,
}
