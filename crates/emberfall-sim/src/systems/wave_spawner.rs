//! Round scheduler: spawns each round's burst and advances the round once
//! every enemy is gone.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use emberfall_ai::waves::{choose_archetype, is_npc_round, RoundComposition};
use emberfall_core::components::{Enemy, Npc};
use emberfall_core::constants::{BOSS_SPAWN_EDGE_MARGIN, SPAWN_EDGE_MARGIN};
use emberfall_core::enums::{EnemyArchetype, RoundPhase};
use emberfall_core::events::GameEvent;
use emberfall_core::types::Position;

use crate::config::Balance;
use crate::systems::{cleanup, npc};
use crate::world_setup;

/// Round progression state.
#[derive(Debug, Clone)]
pub struct RoundScheduler {
    /// Current round, 0 before the first burst.
    pub round: u32,
    pub phase: RoundPhase,
    pub rounds_cleared: u32,
}

impl Default for RoundScheduler {
    /// The first round spawns on the first tick.
    fn default() -> Self {
        Self {
            round: 0,
            phase: RoundPhase::Intermission { spawn_at_ms: 0 },
            rounds_cleared: 0,
        }
    }
}

/// Spawn the burst of `round` around `player_pos` and return what was spawned.
pub fn spawn_round(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    balance: &Balance,
    round: u32,
    player_pos: Position,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) -> RoundComposition {
    let composition = RoundComposition::for_round(round);
    match composition {
        RoundComposition::Boss => {
            let position = world_setup::spawn_position(
                rng,
                player_pos,
                BOSS_SPAWN_EDGE_MARGIN,
                balance.min_spawn_distance,
            );
            world_setup::spawn_boss(
                world,
                round,
                position,
                now_ms + balance.boss_spawn_delay_ms,
            );
            let max_health = emberfall_ai::profiles::boss_stats(round).max_health;
            info!(round, max_health, "Boss spawned");
            events.push(GameEvent::BossSpawned { round, max_health });
        }
        RoundComposition::Enemies(count) => {
            for _ in 0..count {
                let archetype: EnemyArchetype = choose_archetype(rng, round);
                let position = world_setup::spawn_position(
                    rng,
                    player_pos,
                    SPAWN_EDGE_MARGIN,
                    balance.min_spawn_distance,
                );
                world_setup::spawn_enemy(world, archetype, round, position);
                events.push(GameEvent::EnemySpawned {
                    archetype,
                    position,
                });
            }
        }
    }
    composition
}

/// Advance round progression by one tick.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    scheduler: &mut RoundScheduler,
    balance: &Balance,
    player_pos: Position,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    match scheduler.phase {
        RoundPhase::Fighting => {
            let enemies_alive = world.query::<&Enemy>().iter().next().is_some();
            if enemies_alive {
                return;
            }
            info!(round = scheduler.round, "Round cleared");
            events.push(GameEvent::RoundCleared {
                round: scheduler.round,
            });
            scheduler.rounds_cleared += 1;
            scheduler.phase = RoundPhase::Intermission {
                spawn_at_ms: now_ms + balance.round_delay_ms,
            };
            cleanup::remove_finished_npcs(world);
        }
        RoundPhase::Intermission { spawn_at_ms } => {
            if now_ms < spawn_at_ms || npc::dialogue_active(world) {
                return;
            }
            scheduler.round += 1;
            let round = scheduler.round;

            let composition =
                spawn_round(world, rng, balance, round, player_pos, now_ms, events);
            info!(
                round,
                enemies = composition.count(),
                boss = composition == RoundComposition::Boss,
                "Round started"
            );
            events.push(GameEvent::RoundStarted {
                round,
                enemy_count: composition.count(),
                boss: composition == RoundComposition::Boss,
            });

            let npc_present = world.query::<&Npc>().iter().next().is_some();
            if is_npc_round(round) && !npc_present {
                let (_, name) = world_setup::spawn_npc(world, rng);
                info!(round, name, "NPC appeared");
                events.push(GameEvent::NpcAppeared {
                    name: name.to_string(),
                });
            }
            scheduler.phase = RoundPhase::Fighting;
        }
    }
}
