//! Boss behavior finite state machine.
//!
//! Pure functions that compute state transitions, steering and attacks for
//! the boss based on its current state and situation. No ECS dependency,
//! operates on plain data.

use emberfall_core::components::Health;
use emberfall_core::constants::*;
use emberfall_core::enums::BossState;
use emberfall_core::types::{cooldown_elapsed, Position, Velocity};

/// Tunable thresholds of the boss FSM.
#[derive(Debug, Clone, Copy)]
pub struct BossTuning {
    pub aggro_radius: f64,
    pub attack_cooldown_ms: u64,
    pub special_cooldown_ms: u64,
    pub stun_duration_ms: u64,
    pub special_health_fraction: f64,
    pub evade_speed_factor: f64,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            aggro_radius: BOSS_AGGRO_RADIUS,
            attack_cooldown_ms: BOSS_ATTACK_COOLDOWN_MS,
            special_cooldown_ms: BOSS_SPECIAL_COOLDOWN_MS,
            stun_duration_ms: BOSS_STUN_DURATION_MS,
            special_health_fraction: BOSS_SPECIAL_HEALTH_FRACTION,
            evade_speed_factor: BOSS_EVADE_SPEED_FACTOR,
        }
    }
}

/// Input to the boss FSM for a single tick.
pub struct BossContext {
    pub state: BossState,
    pub position: Position,
    /// Position of the player the boss is focused on (the nearest one).
    pub target: Position,
    pub health: Health,
    /// Whether the boss hitbox overlaps the target's hitbox.
    pub colliding: bool,
    pub speed: f64,
    pub attack_damage: f64,
    pub last_attack_ms: Option<u64>,
    pub last_special_ms: Option<u64>,
    pub now_ms: u64,
}

/// Damage the boss deals this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossAction {
    None,
    Strike { damage: f64 },
    SpecialStrike { damage: f64, stun_ms: u64 },
}

/// Output from the boss FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossUpdate {
    pub new_state: BossState,
    pub velocity: Velocity,
    pub action: BossAction,
    pub state_changed: bool,
}

/// Evaluate the FSM for one tick.
///
/// A pending evade step always runs first, so the retreat after a special is
/// never swallowed by the low-health override that follows it.
pub fn evaluate(ctx: &BossContext, tuning: &BossTuning) -> BossUpdate {
    let mut state = ctx.state;
    let mut velocity = Velocity::zero();
    let mut action = BossAction::None;

    let evaded = state == BossState::Evade;
    if evaded {
        velocity = evade_velocity(ctx, tuning);
        state = BossState::Chase;
    }

    if ctx.health.fraction() < tuning.special_health_fraction {
        state = BossState::Special;
    }

    match state {
        BossState::Idle => {
            if ctx.position.distance_to(&ctx.target) < tuning.aggro_radius {
                state = BossState::Chase;
                velocity = chase_velocity(ctx);
                if ctx.colliding {
                    state = BossState::Attack;
                }
            }
        }
        BossState::Chase => {
            // The evade step already used this tick's movement.
            if !evaded {
                velocity = chase_velocity(ctx);
                if ctx.colliding {
                    state = BossState::Attack;
                }
            }
        }
        BossState::Attack => {
            if !ctx.colliding {
                state = BossState::Chase;
                velocity = chase_velocity(ctx);
            } else if cooldown_elapsed(ctx.last_attack_ms, ctx.now_ms, tuning.attack_cooldown_ms) {
                action = BossAction::Strike {
                    damage: ctx.attack_damage,
                };
                state = BossState::Chase;
            }
        }
        BossState::Special => {
            if ctx.colliding
                && cooldown_elapsed(ctx.last_special_ms, ctx.now_ms, tuning.special_cooldown_ms)
            {
                action = BossAction::SpecialStrike {
                    damage: ctx.attack_damage * 2.0,
                    stun_ms: tuning.stun_duration_ms,
                };
                state = BossState::Evade;
            } else if !evaded && !ctx.colliding {
                velocity = chase_velocity(ctx);
            }
        }
        // Evade always resolves to Chase before dispatch.
        BossState::Evade => {}
    }

    BossUpdate {
        new_state: state,
        velocity,
        action,
        state_changed: state != ctx.state,
    }
}

fn chase_velocity(ctx: &BossContext) -> Velocity {
    Velocity::from_dvec2(ctx.position.direction_to(&ctx.target) * ctx.speed)
}

fn evade_velocity(ctx: &BossContext, tuning: &BossTuning) -> Velocity {
    Velocity::from_dvec2(
        ctx.target.direction_to(&ctx.position) * ctx.speed * tuning.evade_speed_factor,
    )
}
