//! Archetype-specific stat profiles and their round scaling.
//!
//! Consolidates per-archetype parameters for spawning and the enemy AI.

use emberfall_core::constants::*;
use emberfall_core::enums::EnemyArchetype;

/// Base (round 1) profile for an enemy archetype.
pub struct ArchetypeProfile {
    /// Movement speed (px per tick).
    pub speed: f64,
    /// Health at round 1.
    pub base_health: f64,
    /// Multiplier on `ENEMY_DAMAGE`.
    pub damage_multiplier: f64,
    /// Size multiplier on `ENEMY_SIZE`.
    pub scale: f64,
    /// Whether non-lethal hits freeze this archetype.
    pub can_freeze: bool,
    pub xp_reward: u32,
}

/// Get the base profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> ArchetypeProfile {
    match archetype {
        EnemyArchetype::Normal => ArchetypeProfile {
            speed: ENEMY_SPEED,
            base_health: ENEMY_HEALTH,
            damage_multiplier: 1.0,
            scale: 1.0,
            can_freeze: true,
            xp_reward: 20,
        },
        EnemyArchetype::Fast => ArchetypeProfile {
            speed: ENEMY_SPEED * 1.75,
            base_health: ENEMY_HEALTH * 0.6,
            damage_multiplier: 0.8,
            scale: 0.8,
            can_freeze: true,
            xp_reward: 25,
        },
        EnemyArchetype::Tank => ArchetypeProfile {
            speed: ENEMY_SPEED * 0.6,
            base_health: ENEMY_HEALTH * 2.0,
            damage_multiplier: 1.5,
            scale: 1.4,
            can_freeze: false,
            xp_reward: 40,
        },
    }
}

/// Stats of one enemy instance scaled to its round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub max_health: f64,
    pub damage: f64,
    pub speed: f64,
    pub scale: f64,
    pub can_freeze: bool,
    pub xp_reward: u32,
}

/// Scale an archetype's profile to `round` (rounds start at 1).
pub fn enemy_stats(archetype: EnemyArchetype, round: u32) -> EnemyStats {
    let profile = get_profile(archetype);
    let steps = round.saturating_sub(1) as f64;
    EnemyStats {
        max_health: profile.base_health * (1.0 + ENEMY_HEALTH_PER_ROUND * steps),
        damage: ENEMY_DAMAGE * profile.damage_multiplier * (1.0 + ENEMY_DAMAGE_PER_ROUND * steps),
        speed: profile.speed,
        scale: profile.scale,
        can_freeze: profile.can_freeze,
        xp_reward: profile.xp_reward,
    }
}

/// Stats of the boss spawned in `round`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossStats {
    pub max_health: f64,
    pub attack_damage: f64,
    pub speed: f64,
    pub scale: f64,
}

pub fn boss_stats(round: u32) -> BossStats {
    let n = round as f64;
    BossStats {
        max_health: BOSS_BASE_HEALTH + n * BOSS_HEALTH_PER_ROUND,
        attack_damage: BOSS_BASE_DAMAGE + n * BOSS_DAMAGE_PER_ROUND,
        speed: BOSS_SPEED,
        scale: BOSS_BASE_SCALE + n * BOSS_SCALE_PER_ROUND,
    }
}
