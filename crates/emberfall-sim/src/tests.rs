//! Tests for the simulation engine, round progression, combat, items, NPCs and peer mirroring.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use emberfall_core::commands::PlayerCommand;
use emberfall_core::components::*;
use emberfall_core::constants::*;
use emberfall_core::enums::*;
use emberfall_core::events::GameEvent;
use emberfall_core::items::{Item, ItemEffect};
use emberfall_core::sync::{EnemySync, PeerUpdate};
use emberfall_core::types::{Position, Velocity};

use emberfall_ai::waves::RoundComposition;

use crate::autopilot::Autopilot;
use crate::config::{Balance, SimConfig};
use crate::engine::SimulationEngine;
use crate::leaderboard::Leaderboard;
use crate::systems::{boss_ai, combat, enemy_ai, items, npc, wave_spawner};
use crate::world_setup;

fn started_engine(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartGame {
        player_name: "tester".to_string(),
    });
    engine
}

fn test_world() -> (World, Entity) {
    let mut world = World::new();
    let player = world_setup::spawn_player(&mut world, "tester");
    (world, player)
}

fn enemy_at(world: &mut World, archetype: EnemyArchetype, position: Position) -> Entity {
    world_setup::spawn_enemy(world, archetype, 1, position)
}

fn set_health(world: &mut World, entity: Entity, current: f64) {
    world.get::<&mut Health>(entity).unwrap().current = current;
}

fn enemy_entities(world: &World) -> Vec<Entity> {
    world
        .query::<&Enemy>()
        .iter()
        .map(|(entity, _)| entity)
        .collect()
}

fn despawn_enemies(world: &mut World) {
    for entity in enemy_entities(world) {
        world.despawn(entity).unwrap();
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = started_engine(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = started_engine(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut pilot_a = Autopilot::new();
    let mut pilot_b = Autopilot::new();

    for _ in 0..900 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");

        engine_a.queue_commands(pilot_a.decide(&snap_a));
        engine_b.queue_commands(pilot_b.decide(&snap_b));
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = started_engine(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = started_engine(SimConfig {
        seed: 222,
        ..Default::default()
    });

    let snap_a = engine_a.tick();
    let snap_b = engine_b.tick();
    let positions_a: Vec<Position> = snap_a.enemies.iter().map(|e| e.position).collect();
    let positions_b: Vec<Position> = snap_b.enemies.iter().map(|e| e.position).collect();
    assert_ne!(positions_a, positions_b, "Different seeds should spawn differently");
}

// ---- Round progression ----

#[test]
fn test_first_round_spawns_on_start() {
    let mut engine = started_engine(SimConfig::default());
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.round, 1);
    assert_eq!(snap.enemies.len(), 4);
    assert!(snap.events.contains(&GameEvent::RoundStarted {
        round: 1,
        enemy_count: 4,
        boss: false,
    }));
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GameStarted { .. })));
}

#[test]
fn test_spawn_round_counts() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let balance = Balance::default();

    for round in 1..=30 {
        let mut world = World::new();
        let mut events = Vec::new();
        let composition = wave_spawner::spawn_round(
            &mut world,
            &mut rng,
            &balance,
            round,
            world_setup::map_center(),
            0,
            &mut events,
        );

        let enemies = enemy_entities(&world).len() as u32;
        let bosses = world.query::<&BossBrain>().iter().count();
        if round % 10 == 0 {
            assert_eq!(composition, RoundComposition::Boss);
            assert_eq!(enemies, 1, "round {round}");
            assert_eq!(bosses, 1, "round {round}");
        } else {
            assert_eq!(enemies, 3 + round, "round {round}");
            assert_eq!(bosses, 0, "round {round}");
        }
    }
}

#[test]
fn test_spawn_respects_min_distance() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let balance = Balance::default();
    let avoid_points = [
        world_setup::map_center(),
        Position::new(60.0, 60.0),
        Position::new(MAP_WIDTH - 100.0, 300.0),
    ];

    for avoid in avoid_points {
        for round in 1..=12 {
            let mut world = World::new();
            let mut events = Vec::new();
            wave_spawner::spawn_round(&mut world, &mut rng, &balance, round, avoid, 0, &mut events);
            for (_, (_, pos)) in world.query::<(&Enemy, &Position)>().iter() {
                assert!(
                    pos.distance_to(&avoid) >= MIN_SPAWN_DISTANCE,
                    "enemy at {pos:?} too close to {avoid:?}"
                );
            }
        }
    }
}

#[test]
fn test_spawn_position_falls_back_to_far_corner() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let avoid = Position::new(100.0, 100.0);
    let pos = world_setup::spawn_position(&mut rng, avoid, SPAWN_EDGE_MARGIN, 50_000.0);
    assert_eq!(
        pos,
        Position::new(MAP_WIDTH - SPAWN_EDGE_MARGIN, MAP_HEIGHT - SPAWN_EDGE_MARGIN)
    );
}

#[test]
fn test_round_advances_after_delay() {
    let mut engine = started_engine(SimConfig::default());
    engine.tick();
    despawn_enemies(engine.world_mut());

    let snap = engine.tick();
    let cleared_at = snap.time.elapsed_ms;
    assert!(snap.events.contains(&GameEvent::RoundCleared { round: 1 }));
    assert_eq!(snap.score.rounds_cleared, 1);

    let mut previous_round = snap.round;
    for _ in 0..400 {
        let snap = engine.tick();
        if snap.round == 2 {
            assert_eq!(previous_round, 1);
            assert!(
                snap.time.elapsed_ms >= cleared_at + ROUND_DELAY_MS,
                "round 2 started after only {} ms",
                snap.time.elapsed_ms - cleared_at
            );
            assert_eq!(snap.enemies.len(), 5);
            return;
        }
        previous_round = snap.round;
    }
    panic!("round 2 never started");
}

#[test]
fn test_npc_dialogue_holds_back_next_round() {
    let mut engine = started_engine(SimConfig::default());
    engine.tick();

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let (npc_entity, _) = world_setup::spawn_npc(engine.world_mut(), &mut rng);
    engine.world_mut().get::<&mut Npc>(npc_entity).unwrap().interacting = true;
    despawn_enemies(engine.world_mut());

    for _ in 0..400 {
        let snap = engine.tick();
        assert_eq!(snap.round, 1, "spawns must wait for the dialogue");
    }

    engine.world_mut().get::<&mut Npc>(npc_entity).unwrap().interacting = false;
    let snap = engine.tick();
    assert_eq!(snap.round, 2);
}

#[test]
fn test_boss_round_spawns_dormant_boss() {
    let (mut world, player) = test_world();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let balance = Balance::default();
    let mut events = Vec::new();

    wave_spawner::spawn_round(
        &mut world,
        &mut rng,
        &balance,
        10,
        world_setup::map_center(),
        1000,
        &mut events,
    );
    assert!(events.contains(&GameEvent::BossSpawned {
        round: 10,
        max_health: 1000.0,
    }));

    let boss = enemy_entities(&world)[0];
    assert_eq!(
        world.get::<&BossBrain>(boss).unwrap().active_at_ms,
        1000 + BOSS_SPAWN_DELAY_MS
    );

    let mut events = Vec::new();
    boss_ai::run(&mut world, Some(player), &balance, 3999, &mut events);
    assert!(events.is_empty(), "dormant boss must not act");
    assert!(!world.get::<&BossBrain>(boss).unwrap().awake);

    boss_ai::run(&mut world, Some(player), &balance, 4000, &mut events);
    assert!(events.contains(&GameEvent::BossAwakened));
    assert!(world.get::<&BossBrain>(boss).unwrap().awake);
}

#[test]
fn test_wounded_boss_switches_to_special() {
    let (mut world, player) = test_world();
    let balance = Balance::default();
    let boss = world_setup::spawn_boss(&mut world, 10, Position::new(200.0, 200.0), 0);
    set_health(&mut world, boss, 400.0);

    let mut events = Vec::new();
    boss_ai::run(&mut world, Some(player), &balance, 100, &mut events);
    assert_eq!(world.get::<&BossBrain>(boss).unwrap().state, BossState::Special);
    assert!(events.contains(&GameEvent::BossStateChanged {
        from: BossState::Idle,
        to: BossState::Special,
    }));
}

#[test]
fn test_boss_special_stuns_player() {
    let (mut world, player) = test_world();
    let balance = Balance::default();
    let boss = world_setup::spawn_boss(&mut world, 10, world_setup::map_center(), 0);
    set_health(&mut world, boss, 100.0);
    *world.get::<&mut Health>(player).unwrap() = Health::full(1000.0);

    let mut events = Vec::new();
    boss_ai::run(&mut world, Some(player), &balance, 100, &mut events);

    // Round 10 boss: 80 damage doubled.
    assert!(events.contains(&GameEvent::PlayerDamaged {
        damage: 160.0,
        remaining: 840.0,
    }));
    assert!(events.contains(&GameEvent::PlayerStunned {
        until_ms: 100 + BOSS_STUN_DURATION_MS,
    }));
    assert_eq!(world.get::<&BossBrain>(boss).unwrap().state, BossState::Evade);
}

// ---- Combat ----

#[test]
fn test_item_drops_every_sixth_kill() {
    let (mut world, player) = test_world();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let balance = Balance::default();
    let center = world_setup::map_center();
    for _ in 0..6 {
        let enemy = enemy_at(&mut world, EnemyArchetype::Normal, center);
        set_health(&mut world, enemy, 1.0);
    }

    let mut events = Vec::new();
    let kills = combat::player_attack(&mut world, player, 0, &balance, &mut events);
    assert_eq!(kills.len(), 6);
    combat::resolve_kills(&mut world, &mut rng, player, kills, &balance, &mut events);

    let drops = events
        .iter()
        .filter(|e| matches!(e, GameEvent::ItemDropped { .. }))
        .count();
    assert_eq!(drops, 1);
    assert!(enemy_entities(&world).is_empty());

    let stats = world.get::<&PlayerStats>(player).unwrap();
    assert_eq!(stats.kills, 6);
    // 6 x 20 XP
    assert_eq!(stats.level, 2);
    assert_eq!(stats.xp, 20);
}

#[test]
fn test_boss_kill_drops_super_potion_and_levels_twice() {
    let (mut world, player) = test_world();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let balance = Balance::default();
    let boss = world_setup::spawn_boss(&mut world, 10, world_setup::map_center(), 0);
    world.get::<&mut BossBrain>(boss).unwrap().awake = true;
    set_health(&mut world, boss, 1.0);

    let mut events = Vec::new();
    let kills = combat::player_attack(&mut world, player, 0, &balance, &mut events);
    combat::resolve_kills(&mut world, &mut rng, player, kills, &balance, &mut events);

    assert!(events.contains(&GameEvent::EnemyKilled {
        archetype: None,
        xp: BOSS_XP_REWARD,
    }));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::ItemDropped {
            kind: ItemKind::SuperHealthPotion,
            ..
        }
    )));
    let level_ups = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerLevelUp { .. }))
        .count();
    assert_eq!(level_ups, 2);
    assert_eq!(world.get::<&PlayerStats>(player).unwrap().level, 3);
}

#[test]
fn test_dormant_boss_cannot_be_hit() {
    let (mut world, player) = test_world();
    let balance = Balance::default();
    let boss = world_setup::spawn_boss(&mut world, 10, world_setup::map_center(), 5000);

    let mut events = Vec::new();
    let kills = combat::player_attack(&mut world, player, 0, &balance, &mut events);
    assert!(kills.is_empty());
    assert!(events.is_empty());
    let health = *world.get::<&Health>(boss).unwrap();
    assert_eq!(health.current, health.max);
}

#[test]
fn test_non_lethal_hit_freezes_unless_tank() {
    let (mut world, player) = test_world();
    let balance = Balance::default();
    let center = world_setup::map_center();
    let normal = enemy_at(&mut world, EnemyArchetype::Normal, center);
    let tank = enemy_at(&mut world, EnemyArchetype::Tank, center);

    let mut events = Vec::new();
    let kills = combat::player_attack(&mut world, player, 0, &balance, &mut events);
    assert!(kills.is_empty());
    assert_eq!(
        world.get::<&EnemyProfile>(normal).unwrap().frozen_until_ms,
        ENEMY_FREEZE_DURATION_MS
    );
    assert_eq!(world.get::<&EnemyProfile>(tank).unwrap().frozen_until_ms, 0);

    let mut events = Vec::new();
    enemy_ai::run(&mut world, Some(player), 100, &mut events);
    assert_eq!(*world.get::<&Velocity>(normal).unwrap(), Velocity::zero());

    // Only the tank strikes: 7 x 1.5
    let hits: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PlayerDamaged { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![ENEMY_DAMAGE * 1.5]);
}

#[test]
fn test_attack_cooldown_and_stun() {
    let (mut world, player) = test_world();
    let balance = Balance::default();
    let enemy = enemy_at(&mut world, EnemyArchetype::Tank, world_setup::map_center());
    let full = world.get::<&Health>(enemy).unwrap().max;

    let mut events = Vec::new();
    combat::player_attack(&mut world, player, 0, &balance, &mut events);
    combat::player_attack(&mut world, player, PLAYER_ATTACK_COOLDOWN_MS - 1, &balance, &mut events);
    assert_eq!(world.get::<&Health>(enemy).unwrap().current, full - PLAYER_DAMAGE);

    combat::stun_player(&mut world, player, 2000, 200, &mut events);
    combat::player_attack(&mut world, player, 300, &balance, &mut events);
    assert_eq!(world.get::<&Health>(enemy).unwrap().current, full - PLAYER_DAMAGE);

    combat::player_attack(&mut world, player, 2200, &balance, &mut events);
    assert_eq!(
        world.get::<&Health>(enemy).unwrap().current,
        full - 2.0 * PLAYER_DAMAGE
    );
}

#[test]
fn test_special_attack_costs_mana_and_has_radius() {
    let (mut world, player) = test_world();
    let balance = Balance::default();
    let center = world_setup::map_center();
    let near = enemy_at(
        &mut world,
        EnemyArchetype::Tank,
        Position::new(center.x + 150.0, center.y),
    );
    let far = enemy_at(
        &mut world,
        EnemyArchetype::Tank,
        Position::new(center.x + 400.0, center.y),
    );
    let full = world.get::<&Health>(near).unwrap().max;

    let mut events = Vec::new();
    combat::player_special(&mut world, player, 0, &balance, &mut events);
    assert_eq!(
        world.get::<&Mana>(player).unwrap().current,
        PLAYER_MANA - PLAYER_MANA_COST
    );
    assert_eq!(
        world.get::<&Health>(near).unwrap().current,
        full - PLAYER_SPECIAL_DAMAGE
    );
    assert_eq!(world.get::<&Health>(far).unwrap().current, full);

    // Still cooling down.
    combat::player_special(&mut world, player, 1000, &balance, &mut events);
    assert_eq!(
        world.get::<&Mana>(player).unwrap().current,
        PLAYER_MANA - PLAYER_MANA_COST
    );
}

#[test]
fn test_defend_halves_damage_for_a_while() {
    let (mut world, player) = test_world();
    let mut events = Vec::new();

    combat::player_defend(&mut world, player, 0);
    combat::damage_player(&mut world, player, 10.0, 500, &mut events);
    assert_eq!(world.get::<&Health>(player).unwrap().current, 95.0);

    combat::damage_player(&mut world, player, 10.0, PLAYER_DEFENSE_DURATION_MS, &mut events);
    assert_eq!(world.get::<&Health>(player).unwrap().current, 85.0);
}

#[test]
fn test_player_death_ends_game_and_records_score() {
    let path = std::env::temp_dir()
        .join("emberfall_test_engine")
        .join("leaderboard.txt");
    let _ = std::fs::remove_file(&path);

    let mut engine = started_engine(SimConfig::default()).with_leaderboard(Leaderboard::new(&path));
    engine.tick();

    let player = engine.player_entity().unwrap();
    let player_pos = engine.local_player_position().unwrap();
    let enemy = enemy_entities(engine.world())[0];
    set_health(engine.world_mut(), player, 1.0);
    *engine.world_mut().get::<&mut Position>(enemy).unwrap() = player_pos;

    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.events.contains(&GameEvent::GameOver {
        player_name: "tester".to_string(),
        rounds: 0,
    }));

    let time = engine.time();
    engine.tick();
    assert_eq!(engine.time(), time, "time must stop after game over");

    let entries = Leaderboard::new(&path).load().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "tester");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_pause_stops_time() {
    let mut engine = started_engine(SimConfig::default());
    engine.tick();
    engine.queue_command(PlayerCommand::Pause);
    let paused = engine.tick();
    assert_eq!(paused.phase, GamePhase::Paused);

    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(engine.time(), paused.time);

    engine.queue_command(PlayerCommand::Resume);
    let resumed = engine.tick();
    assert_eq!(resumed.phase, GamePhase::Active);
    assert!(resumed.time.tick > paused.time.tick);
}

#[test]
fn test_move_command_is_clamped() {
    let mut engine = started_engine(SimConfig::default());
    engine.tick();
    let start = engine.local_player_position().unwrap();

    engine.queue_command(PlayerCommand::Move { dx: 5.0, dy: 0.0 });
    engine.tick();
    let moved = engine.local_player_position().unwrap();
    assert_eq!(moved.x - start.x, PLAYER_SPEED);
    assert_eq!(moved.y, start.y);
}

// ---- Items ----

#[test]
fn test_pickup_and_use_potion() {
    let (mut world, player) = test_world();
    let mut events = Vec::new();
    world_setup::spawn_ground_item(&mut world, ItemKind::HealthPotion, world_setup::map_center());

    items::pickup(&mut world, player, &mut events);
    assert_eq!(world.get::<&Inventory>(player).unwrap().items.len(), 1);
    assert_eq!(world.query::<&GroundItem>().iter().count(), 0);

    set_health(&mut world, player, 50.0);
    items::use_item(&mut world, player, 0, 0, &mut events);
    assert_eq!(world.get::<&Health>(player).unwrap().current, 80.0);
    assert!(events.contains(&GameEvent::ItemUsed {
        kind: ItemKind::HealthPotion,
        effect: ItemEffect::Healed { amount: 30.0 },
    }));

    // The potion is gone.
    let used = events.len();
    items::use_item(&mut world, player, 0, 0, &mut events);
    assert_eq!(events.len(), used);
}

#[test]
fn test_pickup_waits_when_inventory_full() {
    let (mut world, player) = test_world();
    world.get::<&mut Inventory>(player).unwrap().items =
        vec![Item::new(ItemKind::GoldCoin); INVENTORY_CAPACITY];
    world_setup::spawn_ground_item(&mut world, ItemKind::ManaPotion, world_setup::map_center());

    let mut events = Vec::new();
    items::pickup(&mut world, player, &mut events);
    assert!(events.is_empty());
    assert_eq!(world.query::<&GroundItem>().iter().count(), 1);
}

#[test]
fn test_super_potion_boost_expires() {
    let (mut world, player) = test_world();
    world
        .get::<&mut Inventory>(player)
        .unwrap()
        .items
        .push(Item::new(ItemKind::SuperHealthPotion));

    let mut events = Vec::new();
    items::use_item(&mut world, player, 0, 0, &mut events);
    assert_eq!(
        *world.get::<&Health>(player).unwrap(),
        Health::full(PLAYER_HEALTH * SUPER_HEALTH_FACTOR)
    );

    items::expire_buffs(&mut world, ITEM_EFFECT_DURATION_MS - 1, &mut events);
    assert!(!events.contains(&GameEvent::BuffExpired));

    items::expire_buffs(&mut world, ITEM_EFFECT_DURATION_MS, &mut events);
    assert!(events.contains(&GameEvent::BuffExpired));
    assert_eq!(
        *world.get::<&Health>(player).unwrap(),
        Health::full(PLAYER_HEALTH)
    );
}

// ---- NPCs ----

#[test]
fn test_npc_dialogue_respects_delay_and_rewards() {
    let (mut world, player) = test_world();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let center = world_setup::map_center();
    let (npc_entity, _) = world_setup::spawn_npc(&mut world, &mut rng);
    *world.get::<&mut Position>(npc_entity).unwrap() = Position::new(center.x + 50.0, center.y);
    let (lines, reward) = {
        let npc = world.get::<&Npc>(npc_entity).unwrap();
        (npc.dialogues.len(), npc.reward)
    };
    assert_eq!(lines, 3);

    let mut events = Vec::new();
    npc::update_proximity(&mut world, center, NPC_INTERACTION_DISTANCE);
    npc::interact(&mut world, 0, &mut events);
    assert!(npc::dialogue_active(&world));

    let line = |world: &World| world.get::<&Npc>(npc_entity).unwrap().current_line;

    npc::advance(&mut world, player, 1999, NPC_DIALOGUE_DELAY_MS, &mut events);
    assert_eq!(line(&world), 0);
    npc::advance(&mut world, player, 2000, NPC_DIALOGUE_DELAY_MS, &mut events);
    assert_eq!(line(&world), 1);
    npc::advance(&mut world, player, 3000, NPC_DIALOGUE_DELAY_MS, &mut events);
    assert_eq!(line(&world), 1);

    // Walking away pauses the conversation.
    npc::update_proximity(&mut world, Position::new(0.0, 0.0), NPC_INTERACTION_DISTANCE);
    npc::advance(&mut world, player, 4000, NPC_DIALOGUE_DELAY_MS, &mut events);
    assert_eq!(line(&world), 1);

    npc::update_proximity(&mut world, center, NPC_INTERACTION_DISTANCE);
    npc::advance(&mut world, player, 4000, NPC_DIALOGUE_DELAY_MS, &mut events);
    assert_eq!(line(&world), 2);
    npc::advance(&mut world, player, 6000, NPC_DIALOGUE_DELAY_MS, &mut events);

    assert!(!npc::dialogue_active(&world));
    assert!(world.get::<&Npc>(npc_entity).unwrap().finished);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::NpcFinished { reward: r, .. } if *r == reward)));
    assert_eq!(
        world.get::<&Inventory>(player).unwrap().items.len(),
        usize::from(reward.is_some())
    );

    // One-shot: talking again does nothing.
    npc::interact(&mut world, 7000, &mut events);
    assert!(!npc::dialogue_active(&world));
}

// ---- Peers ----

#[test]
fn test_remote_players_are_upserted_and_removed() {
    let mut engine = started_engine(SimConfig::default());
    engine.tick();

    engine.apply_peer_message(PeerUpdate::PlayerMoved {
        player_id: "p2".to_string(),
        position: Position::new(10.0, 20.0),
    });
    engine.apply_peer_message(PeerUpdate::PlayerMoved {
        player_id: "p2".to_string(),
        position: Position::new(30.0, 40.0),
    });
    let snap = engine.tick();
    assert_eq!(snap.remote_players.len(), 1);
    assert_eq!(snap.remote_players[0].position, Position::new(30.0, 40.0));

    engine.apply_peer_message(PeerUpdate::PlayerLeft {
        player_id: "p2".to_string(),
    });
    assert!(engine.tick().remote_players.is_empty());
}

#[test]
fn test_enemy_state_mirrored_without_authority() {
    let mut follower = started_engine(SimConfig {
        authority: false,
        ..Default::default()
    });
    let snap = follower.tick();
    assert!(snap.enemies.is_empty(), "followers do not spawn");

    let enemies = vec![
        EnemySync {
            id: 1,
            archetype: Some(EnemyArchetype::Fast),
            position: Position::new(100.0, 100.0),
            health: 12.0,
        },
        EnemySync {
            id: 2,
            archetype: Some(EnemyArchetype::Tank),
            position: Position::new(1500.0, 900.0),
            health: 80.0,
        },
    ];
    follower.apply_peer_message(PeerUpdate::EnemyState {
        round: 4,
        enemies: enemies.clone(),
    });
    assert_eq!(follower.round(), 4);
    assert_eq!(enemy_entities(follower.world()).len(), 2);

    follower.apply_peer_message(PeerUpdate::EnemyState {
        round: 4,
        enemies: enemies[..1].to_vec(),
    });
    assert_eq!(follower.enemy_sync(), enemies[..1].to_vec());
}

fn synced(id: u64, archetype: Option<EnemyArchetype>, position: Position, health: f64) -> EnemySync {
    EnemySync {
        id,
        archetype,
        position,
        health,
    }
}

#[test]
fn test_enemy_state_updates_mirrored_enemies_in_place() {
    let mut follower = started_engine(SimConfig {
        authority: false,
        ..Default::default()
    });
    follower.tick();

    follower.apply_peer_message(PeerUpdate::EnemyState {
        round: 2,
        enemies: vec![
            synced(1, Some(EnemyArchetype::Normal), Position::new(100.0, 100.0), 20.0),
            synced(2, Some(EnemyArchetype::Fast), Position::new(1500.0, 900.0), 10.0),
        ],
    });
    let first = enemy_entities(follower.world())
        .into_iter()
        .find(|&e| *follower.world().get::<&SyncId>(e).unwrap() == SyncId(1))
        .unwrap();
    follower
        .world_mut()
        .get::<&mut EnemyProfile>(first)
        .unwrap()
        .frozen_until_ms = 5000;

    follower.apply_peer_message(PeerUpdate::EnemyState {
        round: 2,
        enemies: vec![
            synced(1, Some(EnemyArchetype::Normal), Position::new(120.0, 80.0), 5.0),
            synced(3, Some(EnemyArchetype::Tank), Position::new(900.0, 900.0), 60.0),
        ],
    });

    let world = follower.world();
    assert_eq!(enemy_entities(world).len(), 2);
    assert!(world.contains(first), "known ids keep their entity");
    assert_eq!(*world.get::<&Position>(first).unwrap(), Position::new(120.0, 80.0));
    assert_eq!(world.get::<&Health>(first).unwrap().current, 5.0);
    assert_eq!(world.get::<&EnemyProfile>(first).unwrap().frozen_until_ms, 5000);

    let mut ids: Vec<u64> = follower.enemy_sync().iter().map(|s| s.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_repeated_enemy_state_keeps_contact_cooldown() {
    let mut follower = started_engine(SimConfig {
        authority: false,
        ..Default::default()
    });
    follower.tick();
    let player_pos = follower.local_player_position().unwrap();

    let mut hits = 0;
    for tick in 0..55 {
        // The authority publishes every third tick.
        if tick % 3 == 0 {
            follower.apply_peer_message(PeerUpdate::EnemyState {
                round: 1,
                enemies: vec![synced(
                    7,
                    Some(EnemyArchetype::Normal),
                    player_pos,
                    20.0,
                )],
            });
        }
        let snap = follower.tick();
        hits += snap
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerDamaged { .. }))
            .count();
    }
    assert_eq!(enemy_entities(follower.world()).len(), 1);
    assert_eq!(hits, 1, "one contact hit per attack cooldown");
}

#[test]
fn test_repeated_enemy_state_wakes_mirrored_boss_once() {
    let mut follower = started_engine(SimConfig {
        authority: false,
        ..Default::default()
    });
    follower.tick();

    let mut awakenings = 0;
    for tick in 0..30 {
        if tick % 3 == 0 {
            follower.apply_peer_message(PeerUpdate::EnemyState {
                round: 10,
                enemies: vec![synced(99, None, Position::new(150.0, 150.0), 900.0)],
            });
        }
        let snap = follower.tick();
        awakenings += snap
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BossAwakened))
            .count();
    }
    assert_eq!(awakenings, 1);
    let boss = enemy_entities(follower.world())[0];
    assert!(follower.world().get::<&BossBrain>(boss).unwrap().awake);
}

#[test]
fn test_follower_game_over_records_shared_rounds() {
    let mut follower = started_engine(SimConfig {
        authority: false,
        ..Default::default()
    });
    follower.tick();
    for round in 1..=4 {
        follower.apply_peer_message(PeerUpdate::EnemyState {
            round,
            enemies: Vec::new(),
        });
        follower.tick();
    }

    let player = follower.player_entity().unwrap();
    let player_pos = follower.local_player_position().unwrap();
    set_health(follower.world_mut(), player, 1.0);
    follower.apply_peer_message(PeerUpdate::EnemyState {
        round: 5,
        enemies: vec![synced(1, Some(EnemyArchetype::Normal), player_pos, 20.0)],
    });

    let snap = follower.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.score.rounds_cleared, 4);
    assert!(snap.events.contains(&GameEvent::GameOver {
        player_name: "tester".to_string(),
        rounds: 4,
    }));

    // An older round arriving late never lowers the count.
    follower.apply_peer_message(PeerUpdate::EnemyState {
        round: 2,
        enemies: Vec::new(),
    });
    assert_eq!(follower.scheduler().rounds_cleared, 4);
}

#[test]
fn test_authority_ignores_enemy_state() {
    let mut engine = started_engine(SimConfig::default());
    engine.tick();
    engine.apply_peer_message(PeerUpdate::EnemyState {
        round: 9,
        enemies: Vec::new(),
    });
    assert_eq!(engine.round(), 1);
    assert_eq!(enemy_entities(engine.world()).len(), 4);
}

// ---- Config ----

#[test]
fn test_config_overrides_keep_defaults() {
    let config =
        SimConfig::from_json_str(r#"{"seed": 7, "balance": {"round_delay_ms": 10}}"#).unwrap();
    assert_eq!(config.seed, 7);
    assert!(config.authority);
    assert_eq!(config.balance.round_delay_ms, 10);
    assert_eq!(config.balance.enemy_freeze_ms, ENEMY_FREEZE_DURATION_MS);
    assert_eq!(config.balance.item_drop_rate, ITEM_DROP_RATE);
}

#[test]
fn test_config_rejects_bad_json() {
    assert!(SimConfig::from_json_str("{ not json").is_err());
}

// ---- Autopilot ----

#[test]
fn test_autopilot_fights() {
    let mut engine = started_engine(SimConfig::default());
    let mut pilot = Autopilot::new();
    let mut snap = engine.tick();
    for _ in 0..3000 {
        engine.queue_commands(pilot.decide(&snap));
        snap = engine.tick();
        if snap.score.kills > 0 {
            return;
        }
    }
    panic!("autopilot never killed anything");
}
