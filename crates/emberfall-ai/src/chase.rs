//! Regular enemy behavior: walk toward the nearest player and hit on contact.

use emberfall_core::types::{cooldown_elapsed, Position, Velocity};

/// Input for one enemy on one tick.
pub struct EnemyContext {
    pub position: Position,
    pub target: Position,
    pub speed: f64,
    pub damage: f64,
    pub colliding: bool,
    pub frozen: bool,
    pub attack_cooldown_ms: u64,
    pub last_attack_ms: Option<u64>,
    pub now_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyUpdate {
    pub velocity: Velocity,
    /// Damage dealt to the target this tick, if the enemy strikes.
    pub strike: Option<f64>,
}

pub fn evaluate(ctx: &EnemyContext) -> EnemyUpdate {
    if ctx.frozen {
        return EnemyUpdate {
            velocity: Velocity::zero(),
            strike: None,
        };
    }

    let velocity = Velocity::from_dvec2(ctx.position.direction_to(&ctx.target) * ctx.speed);
    let strike = (ctx.colliding
        && cooldown_elapsed(ctx.last_attack_ms, ctx.now_ms, ctx.attack_cooldown_ms))
    .then_some(ctx.damage);

    EnemyUpdate { velocity, strike }
}
