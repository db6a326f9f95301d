//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick (velocities are per tick) and
//! keeps every hitbox inside the map.

use hecs::World;

use emberfall_core::components::PlayerStats;
use emberfall_core::constants::{MAP_HEIGHT, MAP_WIDTH};
use emberfall_core::types::{Hitbox, Position, Velocity};

pub fn run(world: &mut World, now_ms: u64) {
    for (_entity, (pos, vel, hitbox, stats)) in world.query_mut::<(
        &mut Position,
        &Velocity,
        &Hitbox,
        Option<&PlayerStats>,
    )>() {
        // Stunned players stand still.
        if stats.is_some_and(|s| s.stunned_until_ms > now_ms) {
            continue;
        }
        let half_w = (hitbox.width / 2.0).min(MAP_WIDTH / 2.0);
        let half_h = (hitbox.height / 2.0).min(MAP_HEIGHT / 2.0);
        let moved = Position::new(pos.x + vel.x, pos.y + vel.y);
        *pos = moved.clamped(
            Position::new(half_w, half_h),
            Position::new(MAP_WIDTH - half_w, MAP_HEIGHT - half_h),
        );
    }
}
