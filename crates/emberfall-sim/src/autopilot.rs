//! A simple scripted player for headless sessions.
//!
//! Reads the latest snapshot and decides the next commands: fight the
//! nearest enemy, drink potions when hurt, talk to NPCs, collect loot.

use emberfall_core::commands::PlayerCommand;
use emberfall_core::constants::*;
use emberfall_core::enums::{GamePhase, ItemKind};
use emberfall_core::state::{GameStateSnapshot, PlayerView};
use emberfall_core::types::Position;

/// Health fraction below which the autopilot drinks a potion.
const DRINK_BELOW: f64 = 0.4;
/// Loot is collected only when no enemy is closer than this.
const LOOT_SAFE_DISTANCE: f64 = 250.0;

#[derive(Debug, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        if snapshot.phase != GamePhase::Active {
            return Vec::new();
        }
        let Some(player) = &snapshot.player else {
            return Vec::new();
        };
        let mut commands = Vec::new();

        if let Some(slot) = potion_slot(player) {
            commands.push(PlayerCommand::UseItem { slot });
        }

        if let Some(npc) = &snapshot.npc {
            if npc.interacting {
                commands.push(PlayerCommand::Stop);
                commands.push(PlayerCommand::AdvanceDialogue);
                return commands;
            }
            if npc.player_near && !npc.finished {
                commands.push(PlayerCommand::Interact);
            }
        }

        let nearest_enemy = snapshot
            .enemies
            .iter()
            .filter(|e| e.active)
            .min_by(|a, b| {
                player
                    .position
                    .distance_to(&a.position)
                    .total_cmp(&player.position.distance_to(&b.position))
            });

        if let Some(enemy) = nearest_enemy {
            let distance = player.position.distance_to(&enemy.position);
            commands.push(move_toward(player.position, enemy.position));
            let reach = if enemy.boss_state.is_some() {
                BOSS_SIZE
            } else {
                ENEMY_SIZE
            };
            if distance <= reach + PLAYER_ATTACK_REACH {
                commands.push(PlayerCommand::Attack);
            }
            let in_special_range = snapshot
                .enemies
                .iter()
                .filter(|e| e.active && player.position.distance_to(&e.position) <= PLAYER_SPECIAL_RADIUS)
                .count();
            if player.mana >= PLAYER_MANA_COST && in_special_range >= 3 {
                commands.push(PlayerCommand::SpecialAttack);
            }
            if enemy.boss_state.is_some() && distance <= BOSS_SIZE * 2.0 {
                commands.push(PlayerCommand::Defend);
            }
            if distance < LOOT_SAFE_DISTANCE {
                return commands;
            }
        }

        let nearest_loot = snapshot.ground_items.iter().min_by(|a, b| {
            player
                .position
                .distance_to(&a.position)
                .total_cmp(&player.position.distance_to(&b.position))
        });
        if let Some(loot) = nearest_loot {
            if player.inventory.len() < INVENTORY_CAPACITY {
                commands.push(move_toward(player.position, loot.position));
                return commands;
            }
        }

        if let Some(npc) = &snapshot.npc {
            if !npc.finished && !npc.player_near {
                commands.push(move_toward(player.position, npc.position));
                return commands;
            }
        }

        if nearest_enemy.is_none() {
            commands.push(PlayerCommand::Stop);
        }
        commands
    }
}

fn move_toward(from: Position, to: Position) -> PlayerCommand {
    let dir = from.direction_to(&to);
    PlayerCommand::Move {
        dx: dir.x,
        dy: dir.y,
    }
}

fn potion_slot(player: &PlayerView) -> Option<usize> {
    if player.max_health <= 0.0 || player.health / player.max_health >= DRINK_BELOW {
        return None;
    }
    player
        .inventory
        .iter()
        .position(|item| item.kind == ItemKind::SuperHealthPotion)
        .or_else(|| {
            player
                .inventory
                .iter()
                .position(|item| item.kind == ItemKind::HealthPotion)
        })
}
