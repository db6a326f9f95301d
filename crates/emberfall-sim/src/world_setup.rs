//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player, enemies, the boss, NPCs, ground items and mirrored
//! peers with appropriate component bundles.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use emberfall_ai::profiles::{boss_stats, enemy_stats};
use emberfall_core::components::*;
use emberfall_core::constants::*;
use emberfall_core::enums::*;
use emberfall_core::items::Item;
use emberfall_core::sync::EnemySync;
use emberfall_core::types::{Hitbox, Position, Velocity};

use crate::npc_roster;

pub fn map_center() -> Position {
    Position::new(MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0)
}

/// Spawn the local player at the map center.
pub fn spawn_player(world: &mut World, name: &str) -> Entity {
    let stats = PlayerStats {
        level: 1,
        xp: 0,
        xp_to_next_level: PLAYER_XP_TO_NEXT_LEVEL,
        gold: 0,
        kills: 0,
        last_attack_ms: None,
        last_special_ms: None,
        defending_until_ms: 0,
        stunned_until_ms: 0,
    };

    world.spawn((
        Player {
            name: name.to_string(),
        },
        map_center(),
        Velocity::zero(),
        Hitbox::square(PLAYER_SIZE),
        Health::full(PLAYER_HEALTH),
        Mana {
            current: PLAYER_MANA,
            max: PLAYER_MAX_MANA,
        },
        stats,
        Inventory::default(),
        Buffs::default(),
    ))
}

/// Pick a random position inside the map, `margin` away from the edges and
/// at least `min_distance` from `avoid`.
///
/// After `SPAWN_POSITION_ATTEMPTS` rejected samples, the inset map corner
/// farthest from `avoid` is used, so spawning never fails.
pub fn spawn_position(
    rng: &mut ChaCha8Rng,
    avoid: Position,
    margin: f64,
    min_distance: f64,
) -> Position {
    for _ in 0..SPAWN_POSITION_ATTEMPTS {
        let candidate = Position::new(
            rng.gen_range(margin..=MAP_WIDTH - margin),
            rng.gen_range(margin..=MAP_HEIGHT - margin),
        );
        if candidate.distance_to(&avoid) >= min_distance {
            return candidate;
        }
    }

    let corners = [
        Position::new(margin, margin),
        Position::new(MAP_WIDTH - margin, margin),
        Position::new(margin, MAP_HEIGHT - margin),
        Position::new(MAP_WIDTH - margin, MAP_HEIGHT - margin),
    ];
    corners
        .into_iter()
        .max_by(|a, b| a.distance_to(&avoid).total_cmp(&b.distance_to(&avoid)))
        .unwrap_or_default()
}

/// Spawn a regular enemy scaled to `round`.
pub fn spawn_enemy(
    world: &mut World,
    archetype: EnemyArchetype,
    round: u32,
    position: Position,
) -> Entity {
    let stats = enemy_stats(archetype, round);
    world.spawn((
        Enemy,
        position,
        Velocity::zero(),
        Hitbox::square(ENEMY_SIZE).scaled(stats.scale),
        Health::full(stats.max_health),
        EnemyProfile {
            archetype,
            damage: stats.damage,
            speed: stats.speed,
            attack_cooldown_ms: ENEMY_ATTACK_COOLDOWN_MS,
            last_attack_ms: None,
            frozen_until_ms: 0,
            can_freeze: stats.can_freeze,
            xp_reward: stats.xp_reward,
        },
    ))
}

/// Spawn the boss of `round`. It stays dormant until `active_at_ms`.
pub fn spawn_boss(world: &mut World, round: u32, position: Position, active_at_ms: u64) -> Entity {
    let stats = boss_stats(round);
    world.spawn((
        Enemy,
        position,
        Velocity::zero(),
        Hitbox::square(BOSS_SIZE).scaled(stats.scale),
        Health::full(stats.max_health),
        BossBrain {
            state: BossState::Idle,
            attack_damage: stats.attack_damage,
            speed: stats.speed,
            scale: stats.scale,
            last_attack_ms: None,
            last_special_ms: None,
            active_at_ms,
            awake: false,
        },
    ))
}

/// Spawn a random NPC from the roster. Returns the entity and the NPC's name.
pub fn spawn_npc(world: &mut World, rng: &mut ChaCha8Rng) -> (Entity, &'static str) {
    let template = npc_roster::choose(rng);
    let position = Position::new(
        rng.gen_range(NPC_SPAWN_EDGE_MARGIN..=MAP_WIDTH - NPC_SPAWN_EDGE_MARGIN),
        rng.gen_range(NPC_SPAWN_EDGE_MARGIN..=MAP_HEIGHT - NPC_SPAWN_EDGE_MARGIN),
    );
    let npc = Npc {
        name: template.name.to_string(),
        dialogues: template.dialogues.iter().map(|l| l.to_string()).collect(),
        current_line: 0,
        interacting: false,
        finished: false,
        player_near: false,
        last_advance_ms: None,
        reward: template.reward,
    };
    let entity = world.spawn((npc, position, Hitbox::square(PLAYER_SIZE)));
    (entity, template.name)
}

pub fn spawn_ground_item(world: &mut World, kind: ItemKind, position: Position) -> Entity {
    world.spawn((
        GroundItem {
            item: Item::new(kind),
        },
        position,
        Hitbox::square(ITEM_PICKUP_SIZE),
    ))
}

pub fn spawn_remote_player(world: &mut World, player_id: &str, position: Position) -> Entity {
    world.spawn((
        RemotePlayer {
            player_id: player_id.to_string(),
        },
        position,
        Hitbox::square(PLAYER_SIZE),
    ))
}

/// Spawn an enemy mirrored from the round authority.
pub fn spawn_mirrored_enemy(world: &mut World, sync: &EnemySync, round: u32) -> Entity {
    let entity = match sync.archetype {
        Some(archetype) => spawn_enemy(world, archetype, round, sync.position),
        // A mirrored boss is awake; the authority already waited out the delay.
        None => spawn_boss(world, round, sync.position, 0),
    };
    if let Ok(mut health) = world.get::<&mut Health>(entity) {
        health.current = sync.health.min(health.max);
    }
    let _ = world.insert_one(entity, SyncId(sync.id));
    entity
}
