//! Cleanup system: removes dead enemies and spent NPCs.

use hecs::{Entity, World};

use emberfall_core::components::{Enemy, Health, Npc};

/// Remove enemies whose health is gone without a kill being credited, such
/// as mirrored enemies that arrive dead.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (_enemy, health)) in world.query_mut::<(&Enemy, &Health)>() {
        if health.is_depleted() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Remove NPCs whose dialogue has finished.
pub fn remove_finished_npcs(world: &mut World) {
    let finished: Vec<Entity> = world
        .query::<&Npc>()
        .iter()
        .filter(|(_, npc)| npc.finished)
        .map(|(entity, _)| entity)
        .collect();
    for entity in finished {
        let _ = world.despawn(entity);
    }
}
