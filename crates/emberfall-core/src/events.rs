//! Events emitted by the simulation for UI, audio and logging consumers.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::items::ItemEffect;
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    GameStarted {
        player_name: String,
    },
    RoundStarted {
        round: u32,
        enemy_count: u32,
        boss: bool,
    },
    RoundCleared {
        round: u32,
    },
    EnemySpawned {
        archetype: EnemyArchetype,
        position: Position,
    },
    BossSpawned {
        round: u32,
        max_health: f64,
    },
    /// The boss finished its spawn delay and is now active.
    BossAwakened,
    BossStateChanged {
        from: BossState,
        to: BossState,
    },
    EnemyDamaged {
        damage: f64,
        remaining: f64,
        frozen: bool,
    },
    /// `archetype` is None for the boss.
    EnemyKilled {
        archetype: Option<EnemyArchetype>,
        xp: u32,
    },
    PlayerDamaged {
        damage: f64,
        remaining: f64,
    },
    PlayerStunned {
        until_ms: u64,
    },
    PlayerLevelUp {
        level: u32,
    },
    ItemDropped {
        kind: ItemKind,
        position: Position,
    },
    ItemPickedUp {
        kind: ItemKind,
    },
    ItemUsed {
        kind: ItemKind,
        effect: ItemEffect,
    },
    InventoryFull {
        kind: ItemKind,
    },
    BuffExpired,
    NpcAppeared {
        name: String,
    },
    NpcDialogue {
        name: String,
        line_index: usize,
        line: String,
    },
    NpcFinished {
        name: String,
        reward: Option<ItemKind>,
    },
    GameOver {
        player_name: String,
        rounds: u32,
    },
}
