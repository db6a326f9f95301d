//! Round composition: how many enemies, which archetypes, and when the
//! boss and NPC rounds come around.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use emberfall_core::constants::*;
use emberfall_core::enums::EnemyArchetype;

/// What a round spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundComposition {
    /// Regular round with this many enemies.
    Enemies(u32),
    /// A single boss.
    Boss,
}

impl RoundComposition {
    pub fn for_round(round: u32) -> Self {
        if is_boss_round(round) {
            RoundComposition::Boss
        } else {
            RoundComposition::Enemies(ROUND_BASE_ENEMIES + round)
        }
    }

    /// Number of entities the round spawns.
    pub fn count(&self) -> u32 {
        match self {
            RoundComposition::Enemies(n) => *n,
            RoundComposition::Boss => 1,
        }
    }
}

pub fn is_boss_round(round: u32) -> bool {
    round > 0 && round % BOSS_ROUND_INTERVAL == 0
}

pub fn is_npc_round(round: u32) -> bool {
    round > 0 && round % NPC_ROUND_INTERVAL == 0
}

/// Spawn weights for `[Normal, Fast, Tank]` in `round`.
///
/// Every third round leans on tanks; other even rounds lean on fast enemies.
pub fn spawn_weights(round: u32) -> [u32; 3] {
    if round % 3 == 0 {
        [30, 30, 40]
    } else if round % 2 == 0 {
        [40, 40, 20]
    } else {
        [60, 25, 15]
    }
}

/// Pick an archetype for `round` from its weighted distribution.
pub fn choose_archetype(rng: &mut impl Rng, round: u32) -> EnemyArchetype {
    let weights = spawn_weights(round);
    match WeightedIndex::new(weights) {
        Ok(dist) => EnemyArchetype::ALL[dist.sample(rng)],
        // Weight tables are constant and non-zero.
        Err(_) => EnemyArchetype::Normal,
    }
}
