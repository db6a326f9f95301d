//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands and
//! peer updates, runs all systems, and produces `GameStateSnapshot`s.
//! Completely headless (no network dependency), enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use emberfall_core::commands::PlayerCommand;
use emberfall_core::components::{Health, Player, PlayerStats};
use emberfall_core::constants::PLAYER_SPEED;
use emberfall_core::enums::GamePhase;
use emberfall_core::events::GameEvent;
use emberfall_core::state::GameStateSnapshot;
use emberfall_core::sync::{EnemySync, PeerUpdate};
use emberfall_core::types::{Position, SimTime, Velocity};

use crate::config::{Balance, SimConfig};
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::systems;
use crate::systems::combat::Kill;
use crate::systems::wave_spawner::RoundScheduler;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    balance: Balance,
    authority: bool,
    leaderboard: Option<Leaderboard>,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
    scheduler: RoundScheduler,
    player: Option<Entity>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            balance: config.balance,
            authority: config.authority,
            leaderboard: None,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            scheduler: RoundScheduler::default(),
            player: None,
        }
    }

    /// Record finished games in `leaderboard`.
    pub fn with_leaderboard(mut self, leaderboard: Leaderboard) -> Self {
        self.leaderboard = Some(leaderboard);
        self
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply state mirrored from another peer.
    pub fn apply_peer_message(&mut self, update: PeerUpdate) {
        systems::peers::apply(&mut self.world, &mut self.scheduler, self.authority, update);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.scheduler,
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Current round number (0 before the first burst).
    pub fn round(&self) -> u32 {
        self.scheduler.round
    }

    pub fn is_authority(&self) -> bool {
        self.authority
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn local_player_position(&self) -> Option<Position> {
        let player = self.player?;
        self.world.get::<&Position>(player).ok().map(|pos| *pos)
    }

    /// The local enemy set, for peers that mirror this engine.
    pub fn enemy_sync(&self) -> Vec<EnemySync> {
        systems::peers::enemy_sync(&self.world)
    }

    /// Get the round scheduler (for tests).
    #[cfg(test)]
    pub fn scheduler(&self) -> &RoundScheduler {
        &self.scheduler
    }

    /// Get the local player entity (for tests).
    #[cfg(test)]
    pub fn player_entity(&self) -> Option<Entity> {
        self.player
    }

    /// Mutable world access (for tests that stage a situation directly).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        let now_ms = self.time.elapsed_ms;
        match command {
            PlayerCommand::StartGame { player_name } => {
                if matches!(self.phase, GamePhase::MainMenu | GamePhase::GameOver) {
                    self.start_game(&player_name);
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::ReturnToMenu => {
                if matches!(self.phase, GamePhase::Paused | GamePhase::GameOver) {
                    self.world.clear();
                    self.player = None;
                    self.scheduler = RoundScheduler::default();
                    self.phase = GamePhase::MainMenu;
                }
            }
            command => {
                if self.phase != GamePhase::Active {
                    return;
                }
                let Some(player) = self.player else {
                    return;
                };
                self.handle_gameplay_command(player, command, now_ms);
            }
        }
    }

    fn handle_gameplay_command(&mut self, player: Entity, command: PlayerCommand, now_ms: u64) {
        match command {
            PlayerCommand::Move { dx, dy } => {
                if let Ok(mut vel) = self.world.get::<&mut Velocity>(player) {
                    *vel = Velocity::new(
                        dx.clamp(-1.0, 1.0) * PLAYER_SPEED,
                        dy.clamp(-1.0, 1.0) * PLAYER_SPEED,
                    );
                }
            }
            PlayerCommand::Stop => {
                if let Ok(mut vel) = self.world.get::<&mut Velocity>(player) {
                    *vel = Velocity::zero();
                }
            }
            PlayerCommand::Attack => {
                let kills = systems::combat::player_attack(
                    &mut self.world,
                    player,
                    now_ms,
                    &self.balance,
                    &mut self.events,
                );
                self.resolve_kills(player, kills);
            }
            PlayerCommand::SpecialAttack => {
                let kills = systems::combat::player_special(
                    &mut self.world,
                    player,
                    now_ms,
                    &self.balance,
                    &mut self.events,
                );
                self.resolve_kills(player, kills);
            }
            PlayerCommand::Defend => {
                systems::combat::player_defend(&mut self.world, player, now_ms);
            }
            PlayerCommand::Interact => {
                systems::npc::interact(&mut self.world, now_ms, &mut self.events);
            }
            PlayerCommand::AdvanceDialogue => {
                systems::npc::advance(
                    &mut self.world,
                    player,
                    now_ms,
                    self.balance.dialogue_delay_ms,
                    &mut self.events,
                );
            }
            PlayerCommand::UseItem { slot } => {
                systems::items::use_item(&mut self.world, player, slot, now_ms, &mut self.events);
            }
            // Session commands are handled by `handle_command`.
            PlayerCommand::StartGame { .. }
            | PlayerCommand::Pause
            | PlayerCommand::Resume
            | PlayerCommand::ReturnToMenu => {}
        }
    }

    fn start_game(&mut self, player_name: &str) {
        self.world.clear();
        self.time = SimTime::default();
        self.scheduler = RoundScheduler::default();
        self.player = Some(world_setup::spawn_player(&mut self.world, player_name));
        self.phase = GamePhase::Active;
        info!(player = player_name, authority = self.authority, "Game started");
        self.events.push(GameEvent::GameStarted {
            player_name: player_name.to_string(),
        });
    }

    fn resolve_kills(&mut self, player: Entity, kills: Vec<Kill>) {
        if kills.is_empty() {
            return;
        }
        systems::combat::resolve_kills(
            &mut self.world,
            &mut self.rng,
            player,
            kills,
            &self.balance,
            &mut self.events,
        );
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now_ms = self.time.elapsed_ms;
        let player_pos = self
            .local_player_position()
            .unwrap_or_else(world_setup::map_center);

        // 1. Round progression (only the authority spawns)
        if self.authority {
            systems::wave_spawner::run(
                &mut self.world,
                &mut self.rng,
                &mut self.scheduler,
                &self.balance,
                player_pos,
                now_ms,
                &mut self.events,
            );
        }
        // 2. Buff expiry
        systems::items::expire_buffs(&mut self.world, now_ms, &mut self.events);
        // 3. NPC proximity
        systems::npc::update_proximity(
            &mut self.world,
            player_pos,
            self.balance.interaction_distance,
        );
        // 4. Enemy AI (chase, contact hits)
        systems::enemy_ai::run(&mut self.world, self.player, now_ms, &mut self.events);
        // 5. Boss AI
        systems::boss_ai::run(
            &mut self.world,
            self.player,
            &self.balance,
            now_ms,
            &mut self.events,
        );
        // 6. Movement integration
        systems::movement::run(&mut self.world, now_ms);
        // 7. Item pickup
        if let Some(player) = self.player {
            systems::items::pickup(&mut self.world, player, &mut self.events);
        }
        // 8. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 9. Player death
        self.check_game_over();
    }

    fn check_game_over(&mut self) {
        let Some(player) = self.player else {
            return;
        };
        let (name, dead) = {
            let Ok(mut query) = self.world.query_one::<(&Player, &Health)>(player) else {
                return;
            };
            let Some((p, health)) = query.get() else {
                return;
            };
            (p.name.clone(), health.is_depleted())
        };
        if !dead {
            return;
        }

        let rounds = self.scheduler.rounds_cleared;
        let kills = self
            .world
            .get::<&PlayerStats>(player)
            .map(|s| s.kills)
            .unwrap_or(0);
        self.phase = GamePhase::GameOver;
        info!(player = %name, rounds, kills, "Game over");
        self.events.push(GameEvent::GameOver {
            player_name: name.clone(),
            rounds,
        });

        if let Some(leaderboard) = &self.leaderboard {
            if let Err(e) = leaderboard.append(&LeaderboardEntry::new(&name, rounds)) {
                warn!(error = %e, "Failed to record leaderboard entry");
            }
        }
    }
}
