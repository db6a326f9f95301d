//! Boss AI system: wakes the boss after its spawn delay, then drives the
//! boss FSM from emberfall-ai each tick.

use hecs::{Entity, World};
use tracing::debug;

use emberfall_ai::fsm::{evaluate, BossAction, BossContext};
use emberfall_core::components::{BossBrain, Health};
use emberfall_core::enums::BossState;
use emberfall_core::events::GameEvent;
use emberfall_core::types::{Hitbox, Position, Rect, Velocity};

use crate::config::Balance;
use crate::systems::combat;
use crate::systems::enemy_ai::{chase_targets, nearest, player_rect};

struct BossOutcome {
    entity: Entity,
    from: BossState,
    to: BossState,
    velocity: Velocity,
    action: BossAction,
    woke: bool,
}

pub fn run(
    world: &mut World,
    player: Option<Entity>,
    balance: &Balance,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    let tuning = balance.boss_tuning();
    let targets = chase_targets(world);
    let local_rect = player.and_then(|p| player_rect(world, p));

    let mut outcomes: Vec<BossOutcome> = Vec::new();
    {
        let mut query = world.query::<(&Position, &Hitbox, &Health, &BossBrain)>();
        for (entity, (pos, hitbox, health, brain)) in query.iter() {
            if now_ms < brain.active_at_ms {
                continue;
            }
            let woke = !brain.awake;
            let Some(target) = nearest(*pos, &targets) else {
                outcomes.push(BossOutcome {
                    entity,
                    from: brain.state,
                    to: brain.state,
                    velocity: Velocity::zero(),
                    action: BossAction::None,
                    woke,
                });
                continue;
            };
            let colliding =
                local_rect.is_some_and(|r| r.intersects(&Rect::around(*pos, *hitbox)));

            let update = evaluate(
                &BossContext {
                    state: brain.state,
                    position: *pos,
                    target,
                    health: *health,
                    colliding,
                    speed: brain.speed,
                    attack_damage: brain.attack_damage,
                    last_attack_ms: brain.last_attack_ms,
                    last_special_ms: brain.last_special_ms,
                    now_ms,
                },
                &tuning,
            );
            outcomes.push(BossOutcome {
                entity,
                from: brain.state,
                to: update.new_state,
                velocity: update.velocity,
                action: update.action,
                woke,
            });
        }
    }

    for outcome in outcomes {
        if let Ok(mut brain) = world.get::<&mut BossBrain>(outcome.entity) {
            brain.state = outcome.to;
            brain.awake = true;
            match outcome.action {
                BossAction::Strike { .. } => brain.last_attack_ms = Some(now_ms),
                BossAction::SpecialStrike { .. } => brain.last_special_ms = Some(now_ms),
                BossAction::None => {}
            }
        }
        if let Ok(mut vel) = world.get::<&mut Velocity>(outcome.entity) {
            *vel = outcome.velocity;
        }
        if outcome.woke {
            debug!("Boss awakened");
            events.push(GameEvent::BossAwakened);
        }
        if outcome.from != outcome.to {
            debug!(from = ?outcome.from, to = ?outcome.to, "Boss state changed");
            events.push(GameEvent::BossStateChanged {
                from: outcome.from,
                to: outcome.to,
            });
        }

        let Some(player) = player else {
            continue;
        };
        match outcome.action {
            BossAction::None => {}
            BossAction::Strike { damage } => {
                combat::damage_player(world, player, damage, now_ms, events);
            }
            BossAction::SpecialStrike { damage, stun_ms } => {
                combat::damage_player(world, player, damage, now_ms, events);
                combat::stun_player(world, player, stun_ms, now_ms, events);
            }
        }
    }
}
