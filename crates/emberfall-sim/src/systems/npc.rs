//! NPC interaction gate.
//!
//! A dialogue starts when the player is within interaction distance and
//! interacts. Lines advance on request, at most once per dialogue delay,
//! and only while the player stays close. While any dialogue is running the
//! round scheduler holds back the next burst.

use hecs::{Entity, World};
use tracing::info;

use emberfall_core::components::{Inventory, Npc};
use emberfall_core::constants::INVENTORY_CAPACITY;
use emberfall_core::enums::ItemKind;
use emberfall_core::events::GameEvent;
use emberfall_core::items::Item;
use emberfall_core::types::{cooldown_elapsed, Position};

use crate::world_setup;

/// Whether any NPC dialogue is in progress.
pub fn dialogue_active(world: &World) -> bool {
    world
        .query::<&Npc>()
        .iter()
        .any(|(_, npc)| npc.interacting)
}

/// Refresh each NPC's `player_near` flag.
pub fn update_proximity(world: &mut World, player_pos: Position, interaction_distance: f64) {
    for (_entity, (npc, pos)) in world.query_mut::<(&mut Npc, &Position)>() {
        npc.player_near = pos.distance_to(&player_pos) < interaction_distance;
    }
}

/// Start talking to a nearby NPC that has not finished its dialogue.
pub fn interact(world: &mut World, now_ms: u64, events: &mut Vec<GameEvent>) {
    for (_entity, npc) in world.query_mut::<&mut Npc>() {
        if !npc.player_near || npc.finished || npc.interacting || npc.dialogues.is_empty() {
            continue;
        }
        npc.interacting = true;
        npc.current_line = 0;
        npc.last_advance_ms = Some(now_ms);
        events.push(GameEvent::NpcDialogue {
            name: npc.name.clone(),
            line_index: 0,
            line: npc.dialogues[0].clone(),
        });
        // One conversation at a time.
        break;
    }
}

/// Show the next line of the running dialogue, or finish it after the last
/// line. Finishing hands the NPC's reward to the player.
pub fn advance(
    world: &mut World,
    player: Entity,
    now_ms: u64,
    dialogue_delay_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    let mut finished: Option<(String, Option<ItemKind>, Position)> = None;

    for (_entity, (npc, pos)) in world.query_mut::<(&mut Npc, &Position)>() {
        if !npc.interacting || !npc.player_near {
            continue;
        }
        if !cooldown_elapsed(npc.last_advance_ms, now_ms, dialogue_delay_ms) {
            continue;
        }
        npc.last_advance_ms = Some(now_ms);
        if npc.current_line + 1 < npc.dialogues.len() {
            npc.current_line += 1;
            events.push(GameEvent::NpcDialogue {
                name: npc.name.clone(),
                line_index: npc.current_line,
                line: npc.dialogues[npc.current_line].clone(),
            });
        } else {
            npc.interacting = false;
            npc.finished = true;
            finished = Some((npc.name.clone(), npc.reward, *pos));
        }
        break;
    }

    let Some((name, reward, npc_pos)) = finished else {
        return;
    };
    info!(name = %name, ?reward, "NPC dialogue finished");

    if let Some(kind) = reward {
        let stored = match world.get::<&mut Inventory>(player) {
            Ok(mut inventory) if inventory.items.len() < INVENTORY_CAPACITY => {
                inventory.items.push(Item::new(kind));
                true
            }
            _ => false,
        };
        if !stored {
            events.push(GameEvent::InventoryFull { kind });
            world_setup::spawn_ground_item(world, kind, npc_pos);
        }
    }
    events.push(GameEvent::NpcFinished { name, reward });
}
