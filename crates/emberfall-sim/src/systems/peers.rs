//! Mirroring of state received from other peers.
//!
//! Last write wins: every update overwrites whatever the engine held before.
//! Mirrored enemies are matched by their `SyncId`; only position and health
//! come from the wire, cooldowns and freezes stay local.

use std::collections::HashMap;

use hecs::{Entity, World};
use tracing::debug;

use emberfall_core::components::{BossBrain, Enemy, EnemyProfile, Health, RemotePlayer, SyncId};
use emberfall_core::sync::{EnemySync, PeerUpdate};
use emberfall_core::types::Position;

use crate::systems::wave_spawner::RoundScheduler;
use crate::world_setup;

fn find_remote(world: &World, player_id: &str) -> Option<Entity> {
    world
        .query::<&RemotePlayer>()
        .iter()
        .find(|(_, remote)| remote.player_id == player_id)
        .map(|(entity, _)| entity)
}

/// Apply one peer update. Enemy state is ignored by the round authority.
pub fn apply(
    world: &mut World,
    scheduler: &mut RoundScheduler,
    authority: bool,
    update: PeerUpdate,
) {
    match update {
        PeerUpdate::PlayerMoved {
            player_id,
            position,
        } => match find_remote(world, &player_id) {
            Some(entity) => {
                if let Ok(mut pos) = world.get::<&mut Position>(entity) {
                    *pos = position;
                }
            }
            None => {
                debug!(player_id = %player_id, "Remote player joined");
                world_setup::spawn_remote_player(world, &player_id, position);
            }
        },
        PeerUpdate::PlayerLeft { player_id } => {
            if let Some(entity) = find_remote(world, &player_id) {
                debug!(player_id = %player_id, "Remote player left");
                let _ = world.despawn(entity);
            }
        }
        PeerUpdate::EnemyState { round, enemies } => {
            if authority {
                return;
            }
            mirror_enemies(world, &enemies, round);
            scheduler.round = round;
            // Every round before the shared one has been cleared by someone.
            scheduler.rounds_cleared = scheduler.rounds_cleared.max(round.saturating_sub(1));
        }
    }
}

/// Update known enemies in place, spawn new ids, despawn the missing ones.
fn mirror_enemies(world: &mut World, enemies: &[EnemySync], round: u32) {
    let mut known: HashMap<u64, Entity> = HashMap::new();
    let mut stale = Vec::new();
    for (entity, (_, sync_id)) in world.query::<(&Enemy, Option<&SyncId>)>().iter() {
        match sync_id {
            Some(id) => {
                known.insert(id.0, entity);
            }
            None => stale.push(entity),
        }
    }

    for sync in enemies {
        match known.remove(&sync.id) {
            Some(entity) => {
                if let Ok((pos, health)) = world.query_one_mut::<(&mut Position, &mut Health)>(entity)
                {
                    *pos = sync.position;
                    health.current = sync.health.min(health.max);
                }
            }
            None => {
                world_setup::spawn_mirrored_enemy(world, sync, round);
            }
        }
    }

    stale.extend(known.into_values());
    for entity in stale {
        let _ = world.despawn(entity);
    }
}

/// The local enemy set in mirrorable form.
pub fn enemy_sync(world: &World) -> Vec<EnemySync> {
    world
        .query::<(
            &Enemy,
            &Position,
            &Health,
            Option<&EnemyProfile>,
            Option<&BossBrain>,
            Option<&SyncId>,
        )>()
        .iter()
        // A dormant boss is not shown to peers yet.
        .filter(|(_, (_, _, _, _, brain, _))| brain.map_or(true, |b| b.awake))
        .map(|(entity, (_, pos, health, profile, _, sync_id))| EnemySync {
            id: sync_id.map_or_else(|| entity.to_bits().get(), |id| id.0),
            archetype: profile.map(|p| p.archetype),
            position: *pos,
            health: health.current,
        })
        .collect()
}
