//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Balanced speed, health and damage.
    #[default]
    Normal,
    /// Quick and fragile.
    Fast,
    /// Slow, durable, hits hard. Cannot be frozen.
    Tank,
}

impl EnemyArchetype {
    /// Order used by weight tables: `[Normal, Fast, Tank]`.
    pub const ALL: [EnemyArchetype; 3] = [
        EnemyArchetype::Normal,
        EnemyArchetype::Fast,
        EnemyArchetype::Tank,
    ];
}

/// Boss behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossState {
    #[default]
    Idle,
    Chase,
    Attack,
    Special,
    Evade,
}

/// Item kinds that can drop or be rewarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    HealthPotion,
    ManaPotion,
    GoldCoin,
    SuperHealthPotion,
}

/// Item rarity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    GameOver,
}

/// Where the round scheduler is within the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Enemies of the current round are alive.
    Fighting,
    /// Round cleared; the next burst spawns at `spawn_at_ms`.
    Intermission { spawn_at_ms: u64 },
}

/// Outcome of applying damage to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Health dropped but stayed above zero.
    Wounded,
    /// Health reached zero or below.
    Lethal,
}
