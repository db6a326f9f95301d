//! Item pickup, item use and timed buff expiry.

use hecs::{Entity, World};

use emberfall_core::actor::{expire_max_health_boost, PlayerActor};
use emberfall_core::components::*;
use emberfall_core::constants::INVENTORY_CAPACITY;
use emberfall_core::events::GameEvent;
use emberfall_core::types::{Hitbox, Position, Rect};

use crate::systems::enemy_ai::player_rect;

/// Move ground items the player walks over into the inventory. Items stay
/// on the ground while the inventory is full.
pub fn pickup(world: &mut World, player: Entity, events: &mut Vec<GameEvent>) {
    let Some(rect) = player_rect(world, player) else {
        return;
    };
    let free = match world.get::<&Inventory>(player) {
        Ok(inventory) => INVENTORY_CAPACITY.saturating_sub(inventory.items.len()),
        Err(_) => return,
    };
    if free == 0 {
        return;
    }

    let touched: Vec<Entity> = world
        .query::<(&GroundItem, &Position, &Hitbox)>()
        .iter()
        .filter(|(_, (_, pos, hitbox))| rect.intersects(&Rect::around(**pos, **hitbox)))
        .map(|(entity, _)| entity)
        .take(free)
        .collect();

    for entity in touched {
        let Ok(ground) = world.remove_one::<GroundItem>(entity) else {
            continue;
        };
        let _ = world.despawn(entity);
        let kind = ground.item.kind;
        if let Ok(mut inventory) = world.get::<&mut Inventory>(player) {
            inventory.items.push(ground.item);
        }
        events.push(GameEvent::ItemPickedUp { kind });
    }
}

/// Use the item in inventory `slot`. Out-of-range slots are ignored.
pub fn use_item(
    world: &mut World,
    player: Entity,
    slot: usize,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    let Ok(mut query) = world.query_one::<(
        &mut Health,
        &mut Mana,
        &mut PlayerStats,
        &mut Buffs,
        &mut Inventory,
    )>(player) else {
        return;
    };
    let Some((health, mana, stats, buffs, inventory)) = query.get() else {
        return;
    };
    if slot >= inventory.items.len() {
        return;
    }

    let item = inventory.items.remove(slot);
    let kind = item.kind;
    let mut actor = PlayerActor {
        health,
        mana,
        stats,
        buffs,
    };
    let effect = item.apply(&mut actor, now_ms);
    events.push(GameEvent::ItemUsed { kind, effect });
}

/// Drop timed buffs that ran out.
pub fn expire_buffs(world: &mut World, now_ms: u64, events: &mut Vec<GameEvent>) {
    for (_entity, (health, buffs)) in world.query_mut::<(&mut Health, &mut Buffs)>() {
        if expire_max_health_boost(health, buffs, now_ms) {
            events.push(GameEvent::BuffExpired);
        }
    }
}
