//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only and never modifies the world.

use hecs::World;

use emberfall_core::components::*;
use emberfall_core::enums::GamePhase;
use emberfall_core::events::GameEvent;
use emberfall_core::state::*;
use emberfall_core::types::{Position, SimTime};

use crate::systems::wave_spawner::RoundScheduler;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    scheduler: &RoundScheduler,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    let player = build_player(world, time.elapsed_ms);
    let score = ScoreView {
        rounds_cleared: scheduler.rounds_cleared,
        kills: world
            .query::<&PlayerStats>()
            .iter()
            .map(|(_, stats)| stats.kills)
            .next()
            .unwrap_or(0),
        level: player.as_ref().map_or(0, |p| p.level),
    };

    GameStateSnapshot {
        time: *time,
        phase,
        round: scheduler.round,
        player,
        remote_players: build_remote_players(world),
        enemies: build_enemies(world, time.elapsed_ms),
        ground_items: build_ground_items(world),
        npc: build_npc(world),
        events,
        score,
    }
}

fn build_player(world: &World, now_ms: u64) -> Option<PlayerView> {
    let mut query = world.query::<(
        &Player,
        &Position,
        &Health,
        &Mana,
        &PlayerStats,
        &Inventory,
    )>();
    query
        .iter()
        .next()
        .map(|(_, (player, pos, health, mana, stats, inventory))| PlayerView {
            name: player.name.clone(),
            position: *pos,
            health: health.current,
            max_health: health.max,
            mana: mana.current,
            max_mana: mana.max,
            level: stats.level,
            xp: stats.xp,
            xp_to_next_level: stats.xp_to_next_level,
            gold: stats.gold,
            inventory: inventory.items.clone(),
            stunned: stats.stunned_until_ms > now_ms,
            defending: stats.defending_until_ms > now_ms,
        })
}

fn build_remote_players(world: &World) -> Vec<RemotePlayerView> {
    let mut players: Vec<RemotePlayerView> = world
        .query::<(&RemotePlayer, &Position)>()
        .iter()
        .map(|(_, (remote, pos))| RemotePlayerView {
            player_id: remote.player_id.clone(),
            position: *pos,
        })
        .collect();
    players.sort_by(|a, b| a.player_id.cmp(&b.player_id));
    players
}

fn build_enemies(world: &World, now_ms: u64) -> Vec<EnemyView> {
    world
        .query::<(
            &Enemy,
            &Position,
            &Health,
            Option<&EnemyProfile>,
            Option<&BossBrain>,
        )>()
        .iter()
        .map(|(_, (_, pos, health, profile, brain))| EnemyView {
            archetype: profile.map(|p| p.archetype),
            boss_state: brain.map(|b| b.state),
            position: *pos,
            health: health.current,
            max_health: health.max,
            frozen: profile.is_some_and(|p| p.frozen_until_ms > now_ms),
            active: brain.map_or(true, |b| b.awake),
        })
        .collect()
}

fn build_ground_items(world: &World) -> Vec<GroundItemView> {
    world
        .query::<(&GroundItem, &Position)>()
        .iter()
        .map(|(_, (ground, pos))| GroundItemView {
            item: ground.item.clone(),
            position: *pos,
        })
        .collect()
}

fn build_npc(world: &World) -> Option<NpcView> {
    let mut query = world.query::<(&Npc, &Position)>();
    query.iter().next().map(|(_, (npc, pos))| NpcView {
        name: npc.name.clone(),
        position: *pos,
        line: npc
            .interacting
            .then(|| npc.dialogues.get(npc.current_line).cloned())
            .flatten(),
        interacting: npc.interacting,
        finished: npc.finished,
        player_near: npc.player_near,
    })
}
