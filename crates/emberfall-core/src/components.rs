//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems and in the
//! `Actor` views, not in components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::items::Item;

/// Current and maximum health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    /// Remaining health as a fraction of max (0.0 when max is zero).
    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

/// Current and maximum mana.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mana {
    pub current: f64,
    pub max: f64,
}

/// Marks the local player. Exactly one per world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
}

/// Leveling, economy and action timers of the local player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub gold: u32,
    pub kills: u32,
    /// Time of the last basic attack (None = never attacked).
    pub last_attack_ms: Option<u64>,
    /// Time of the last special attack.
    pub last_special_ms: Option<u64>,
    /// Incoming damage is reduced until this time.
    pub defending_until_ms: u64,
    /// Movement and attacks are ignored until this time.
    pub stunned_until_ms: u64,
}

/// Items carried by the player, in pickup order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<Item>,
}

/// Temporary max-health increase from a Super Health Potion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxHealthBoost {
    /// Max health before the boost, restored on expiry.
    pub base_max: f64,
    pub expires_at_ms: u64,
}

/// Timed effects active on an actor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Buffs {
    pub max_health_boost: Option<MaxHealthBoost>,
}

/// Marks a hostile entity. The live-enemy set is every entity with this marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;

/// Id of an enemy mirrored from the round authority, as the authority
/// reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncId(pub u64);

/// Combat parameters of a regular (non-boss) enemy, already scaled to its round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub archetype: EnemyArchetype,
    pub damage: f64,
    pub speed: f64,
    pub attack_cooldown_ms: u64,
    pub last_attack_ms: Option<u64>,
    /// The enemy neither moves nor attacks until this time.
    pub frozen_until_ms: u64,
    pub can_freeze: bool,
    pub xp_reward: u32,
}

/// Boss state machine data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossBrain {
    pub state: BossState,
    pub attack_damage: f64,
    pub speed: f64,
    pub scale: f64,
    pub last_attack_ms: Option<u64>,
    pub last_special_ms: Option<u64>,
    /// The boss stays dormant (invisible, inert) until this time.
    pub active_at_ms: u64,
    pub awake: bool,
}

/// A player mirrored from another peer. Never damaged locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePlayer {
    pub player_id: String,
}

/// An item lying on the map, waiting to be picked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundItem {
    pub item: Item,
}

/// Scripted NPC with a one-shot dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    pub dialogues: Vec<String>,
    pub current_line: usize,
    pub interacting: bool,
    pub finished: bool,
    pub player_near: bool,
    pub last_advance_ms: Option<u64>,
    pub reward: Option<ItemKind>,
}
