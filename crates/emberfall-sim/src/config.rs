//! Engine configuration.
//!
//! Every balance value defaults to its constant in `emberfall_core::constants`;
//! a JSON file only needs to name the values it overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use emberfall_ai::fsm::BossTuning;
use emberfall_core::constants::*;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Gameplay values that may be tuned without recompiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub enemy_freeze_ms: u64,
    pub boss_stun_ms: u64,
    pub boss_spawn_delay_ms: u64,
    pub boss_aggro_radius: f64,
    pub round_delay_ms: u64,
    pub dialogue_delay_ms: u64,
    pub interaction_distance: f64,
    /// An item drops on every `item_drop_rate`-th kill.
    pub item_drop_rate: u32,
    pub super_health_drop_chance: f64,
    pub min_spawn_distance: f64,
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            enemy_freeze_ms: ENEMY_FREEZE_DURATION_MS,
            boss_stun_ms: BOSS_STUN_DURATION_MS,
            boss_spawn_delay_ms: BOSS_SPAWN_DELAY_MS,
            boss_aggro_radius: BOSS_AGGRO_RADIUS,
            round_delay_ms: ROUND_DELAY_MS,
            dialogue_delay_ms: NPC_DIALOGUE_DELAY_MS,
            interaction_distance: NPC_INTERACTION_DISTANCE,
            item_drop_rate: ITEM_DROP_RATE,
            super_health_drop_chance: SUPER_HEALTH_DROP_CHANCE,
            min_spawn_distance: MIN_SPAWN_DISTANCE,
        }
    }
}

impl Balance {
    /// Boss FSM thresholds with this balance applied.
    pub fn boss_tuning(&self) -> BossTuning {
        BossTuning {
            aggro_radius: self.boss_aggro_radius,
            stun_duration_ms: self.boss_stun_ms,
            ..BossTuning::default()
        }
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Whether this engine spawns enemies. Peers without authority mirror
    /// enemies from the authority's state messages.
    pub authority: bool,
    pub balance: Balance,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            authority: true,
            balance: Balance::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
