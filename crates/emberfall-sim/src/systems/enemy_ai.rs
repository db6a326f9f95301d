//! Regular enemy AI system: chase the nearest player, hit the local player
//! on contact.
//!
//! Calls the chase decision from emberfall-ai, then updates ECS components
//! accordingly.

use hecs::{Entity, World};

use emberfall_ai::chase::{evaluate, EnemyContext};
use emberfall_core::components::{Enemy, EnemyProfile, Player, RemotePlayer};
use emberfall_core::events::GameEvent;
use emberfall_core::types::{Hitbox, Position, Rect, Velocity};

use crate::systems::combat;

/// Positions of every player an enemy may chase, local first.
pub fn chase_targets(world: &World) -> Vec<Position> {
    let mut targets: Vec<Position> = world
        .query::<(&Player, &Position)>()
        .iter()
        .map(|(_, (_, pos))| *pos)
        .collect();
    targets.extend(
        world
            .query::<(&RemotePlayer, &Position)>()
            .iter()
            .map(|(_, (_, pos))| *pos),
    );
    targets
}

pub fn nearest(from: Position, targets: &[Position]) -> Option<Position> {
    targets
        .iter()
        .copied()
        .min_by(|a, b| from.distance_to(a).total_cmp(&from.distance_to(b)))
}

/// Hitbox rectangle of the local player.
pub fn player_rect(world: &World, player: Entity) -> Option<Rect> {
    let mut query = world.query_one::<(&Position, &Hitbox)>(player).ok()?;
    let (pos, hitbox) = query.get()?;
    Some(Rect::around(*pos, *hitbox))
}

/// Run the enemy AI: evaluate each regular enemy, then apply movement and
/// strikes. Bosses are handled by `boss_ai`.
pub fn run(world: &mut World, player: Option<Entity>, now_ms: u64, events: &mut Vec<GameEvent>) {
    let targets = chase_targets(world);
    let local_rect = player.and_then(|p| player_rect(world, p));

    // Collect updates in a buffer to avoid borrow issues with hecs
    let mut updates: Vec<(Entity, Velocity, Option<f64>)> = Vec::new();
    {
        let mut query = world.query::<(&Enemy, &Position, &Hitbox, &EnemyProfile)>();
        for (entity, (_enemy, pos, hitbox, profile)) in query.iter() {
            let Some(target) = nearest(*pos, &targets) else {
                updates.push((entity, Velocity::zero(), None));
                continue;
            };
            let colliding =
                local_rect.is_some_and(|r| r.intersects(&Rect::around(*pos, *hitbox)));

            let update = evaluate(&EnemyContext {
                position: *pos,
                target,
                speed: profile.speed,
                damage: profile.damage,
                colliding,
                frozen: profile.frozen_until_ms > now_ms,
                attack_cooldown_ms: profile.attack_cooldown_ms,
                last_attack_ms: profile.last_attack_ms,
                now_ms,
            });
            updates.push((entity, update.velocity, update.strike));
        }
    }

    for (entity, velocity, strike) in updates {
        if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
            *vel = velocity;
        }
        let (Some(damage), Some(player)) = (strike, player) else {
            continue;
        };
        if let Ok(mut profile) = world.get::<&mut EnemyProfile>(entity) {
            profile.last_attack_ms = Some(now_ms);
        }
        combat::damage_player(world, player, damage, now_ms, events);
    }
}
