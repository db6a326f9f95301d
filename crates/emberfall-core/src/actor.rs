//! The `Actor` capability interface.
//!
//! Players and enemies are stored as separate component bundles; systems that
//! only care about "something with health" (combat, item effects) work through
//! this trait over borrowed component views.

use crate::components::{Buffs, Health, Mana, MaxHealthBoost, PlayerStats};
use crate::enums::DamageOutcome;

pub trait Actor {
    fn health(&self) -> Health;

    fn health_mut(&mut self) -> &mut Health;

    /// Subtract `amount` from current health.
    fn apply_damage(&mut self, amount: f64) -> DamageOutcome {
        let health = self.health_mut();
        health.current -= amount.max(0.0);
        if health.current <= 0.0 {
            health.current = 0.0;
            DamageOutcome::Lethal
        } else {
            DamageOutcome::Wounded
        }
    }

    /// Restore health, never beyond max.
    fn heal(&mut self, amount: f64) {
        let health = self.health_mut();
        health.current = (health.current + amount).min(health.max);
    }

    /// Restore mana. Returns false if this actor has no mana pool.
    fn restore_mana(&mut self, _amount: f64) -> bool {
        false
    }

    /// Returns false if this actor cannot carry gold.
    fn add_gold(&mut self, _amount: u32) -> bool {
        false
    }

    /// Multiply max health until `until_ms`. Returns false if unsupported.
    fn boost_max_health(&mut self, _factor: f64, _until_ms: u64) -> bool {
        false
    }
}

/// Mutable view over the local player's components.
pub struct PlayerActor<'a> {
    pub health: &'a mut Health,
    pub mana: &'a mut Mana,
    pub stats: &'a mut PlayerStats,
    pub buffs: &'a mut Buffs,
}

impl Actor for PlayerActor<'_> {
    fn health(&self) -> Health {
        *self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        self.health
    }

    fn restore_mana(&mut self, amount: f64) -> bool {
        self.mana.current = (self.mana.current + amount).min(self.mana.max);
        true
    }

    fn add_gold(&mut self, amount: u32) -> bool {
        self.stats.gold = self.stats.gold.saturating_add(amount);
        true
    }

    fn boost_max_health(&mut self, factor: f64, until_ms: u64) -> bool {
        // A second potion while boosted only extends the duration.
        match self.buffs.max_health_boost.as_mut() {
            Some(boost) => boost.expires_at_ms = boost.expires_at_ms.max(until_ms),
            None => {
                self.buffs.max_health_boost = Some(MaxHealthBoost {
                    base_max: self.health.max,
                    expires_at_ms: until_ms,
                });
                self.health.max *= factor;
            }
        }
        self.health.current = self.health.max;
        true
    }
}

/// Mutable view over an enemy's (or boss's) health.
pub struct EnemyActor<'a> {
    pub health: &'a mut Health,
}

impl Actor for EnemyActor<'_> {
    fn health(&self) -> Health {
        *self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        self.health
    }
}

/// Drop an expired max-health boost, clamping current health to the restored max.
/// Returns true if a boost expired.
pub fn expire_max_health_boost(health: &mut Health, buffs: &mut Buffs, now_ms: u64) -> bool {
    match buffs.max_health_boost {
        Some(boost) if now_ms >= boost.expires_at_ms => {
            health.max = boost.base_max;
            health.current = health.current.min(health.max);
            buffs.max_health_boost = None;
            true
        }
        _ => false,
    }
}
