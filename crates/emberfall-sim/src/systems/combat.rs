//! Combat resolution: player attacks, hits on enemies, hits on the player,
//! kills and their rewards.
//!
//! Attacks are cooldown-gated and land on hitbox overlap. Kills are collected
//! while the world is borrowed and resolved afterwards.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use emberfall_core::actor::{Actor, EnemyActor, PlayerActor};
use emberfall_core::components::*;
use emberfall_core::constants::*;
use emberfall_core::enums::{DamageOutcome, EnemyArchetype, ItemKind};
use emberfall_core::events::GameEvent;
use emberfall_core::types::{cooldown_elapsed, Hitbox, Position, Rect};

use crate::config::Balance;
use crate::world_setup;

/// An enemy that died this tick, waiting for its rewards to be handed out.
#[derive(Debug, Clone, Copy)]
pub struct Kill {
    pub entity: Entity,
    /// None for the boss.
    pub archetype: Option<EnemyArchetype>,
    pub xp: u32,
    pub position: Position,
}

/// Player damage multiplier at `level`.
pub fn level_multiplier(level: u32) -> f64 {
    1.0 + PLAYER_DAMAGE_PER_LEVEL * level.saturating_sub(1) as f64
}

fn player_ready(world: &World, player: Entity, now_ms: u64) -> Option<(Position, Hitbox, u32)> {
    let mut query = world
        .query_one::<(&Position, &Hitbox, &PlayerStats)>(player)
        .ok()?;
    let (pos, hitbox, stats) = query.get()?;
    if stats.stunned_until_ms > now_ms {
        return None;
    }
    Some((*pos, *hitbox, stats.level))
}

/// Whether an enemy can currently be hit. A dormant boss cannot.
fn is_targetable(brain: Option<&BossBrain>) -> bool {
    brain.map_or(true, |b| b.awake)
}

/// Basic attack: hits every enemy overlapping the player's attack box.
pub fn player_attack(
    world: &mut World,
    player: Entity,
    now_ms: u64,
    balance: &Balance,
    events: &mut Vec<GameEvent>,
) -> Vec<Kill> {
    let Some((pos, hitbox, level)) = player_ready(world, player, now_ms) else {
        return Vec::new();
    };
    {
        let Ok(mut stats) = world.get::<&mut PlayerStats>(player) else {
            return Vec::new();
        };
        if !cooldown_elapsed(stats.last_attack_ms, now_ms, PLAYER_ATTACK_COOLDOWN_MS) {
            return Vec::new();
        }
        stats.last_attack_ms = Some(now_ms);
    }

    let attack_box = Rect::around(pos, hitbox).inflated(PLAYER_ATTACK_REACH);
    let targets: Vec<Entity> = world
        .query::<(&Enemy, &Position, &Hitbox, Option<&BossBrain>)>()
        .iter()
        .filter(|(_, (_, epos, ehitbox, brain))| {
            is_targetable(*brain) && attack_box.intersects(&Rect::around(**epos, **ehitbox))
        })
        .map(|(entity, _)| entity)
        .collect();

    let damage = PLAYER_DAMAGE * level_multiplier(level);
    hit_enemies(world, &targets, damage, now_ms, balance, events)
}

/// Special attack: spends mana to hit every enemy within the special radius.
pub fn player_special(
    world: &mut World,
    player: Entity,
    now_ms: u64,
    balance: &Balance,
    events: &mut Vec<GameEvent>,
) -> Vec<Kill> {
    let Some((pos, _, level)) = player_ready(world, player, now_ms) else {
        return Vec::new();
    };
    {
        let Ok(mut query) = world.query_one::<(&mut Mana, &mut PlayerStats)>(player) else {
            return Vec::new();
        };
        let Some((mana, stats)) = query.get() else {
            return Vec::new();
        };
        if mana.current < PLAYER_MANA_COST
            || !cooldown_elapsed(stats.last_special_ms, now_ms, PLAYER_SPECIAL_COOLDOWN_MS)
        {
            return Vec::new();
        }
        mana.current -= PLAYER_MANA_COST;
        stats.last_special_ms = Some(now_ms);
    }

    let targets: Vec<Entity> = world
        .query::<(&Enemy, &Position, Option<&BossBrain>)>()
        .iter()
        .filter(|(_, (_, epos, brain))| {
            is_targetable(*brain) && epos.distance_to(&pos) <= PLAYER_SPECIAL_RADIUS
        })
        .map(|(entity, _)| entity)
        .collect();

    let damage = PLAYER_SPECIAL_DAMAGE * level_multiplier(level);
    hit_enemies(world, &targets, damage, now_ms, balance, events)
}

/// Raise the player's guard for the defense duration.
pub fn player_defend(world: &mut World, player: Entity, now_ms: u64) {
    if let Ok(mut stats) = world.get::<&mut PlayerStats>(player) {
        if stats.stunned_until_ms <= now_ms {
            stats.defending_until_ms = now_ms + PLAYER_DEFENSE_DURATION_MS;
        }
    }
}

/// Damage each target; non-lethal hits freeze enemies that can be frozen.
fn hit_enemies(
    world: &mut World,
    targets: &[Entity],
    damage: f64,
    now_ms: u64,
    balance: &Balance,
    events: &mut Vec<GameEvent>,
) -> Vec<Kill> {
    let mut kills = Vec::new();
    for &entity in targets {
        let Ok(mut query) =
            world.query_one::<(&mut Health, &Position, Option<&mut EnemyProfile>)>(entity)
        else {
            continue;
        };
        let Some((health, pos, profile)) = query.get() else {
            continue;
        };

        let outcome = EnemyActor { health: &mut *health }.apply_damage(damage);
        let remaining = health.current;
        match outcome {
            DamageOutcome::Lethal => {
                let (archetype, xp) = match profile {
                    Some(profile) => (Some(profile.archetype), profile.xp_reward),
                    None => (None, BOSS_XP_REWARD),
                };
                kills.push(Kill {
                    entity,
                    archetype,
                    xp,
                    position: *pos,
                });
            }
            DamageOutcome::Wounded => {
                let mut frozen = false;
                if let Some(profile) = profile {
                    if profile.can_freeze {
                        profile.frozen_until_ms = now_ms + balance.enemy_freeze_ms;
                        frozen = true;
                    }
                }
                events.push(GameEvent::EnemyDamaged {
                    damage,
                    remaining,
                    frozen,
                });
            }
        }
    }
    kills
}

/// Damage the local player. Defending halves the hit.
pub fn damage_player(
    world: &mut World,
    player: Entity,
    amount: f64,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) -> DamageOutcome {
    let Ok(mut query) =
        world.query_one::<(&mut Health, &mut Mana, &mut PlayerStats, &mut Buffs)>(player)
    else {
        return DamageOutcome::Wounded;
    };
    let Some((health, mana, stats, buffs)) = query.get() else {
        return DamageOutcome::Wounded;
    };
    let amount = if stats.defending_until_ms > now_ms {
        amount * PLAYER_DEFENSE_REDUCTION
    } else {
        amount
    };
    let mut actor = PlayerActor {
        health,
        mana,
        stats,
        buffs,
    };
    let outcome = actor.apply_damage(amount);
    events.push(GameEvent::PlayerDamaged {
        damage: amount,
        remaining: actor.health().current,
    });
    outcome
}

pub fn stun_player(
    world: &mut World,
    player: Entity,
    duration_ms: u64,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    if let Ok(mut stats) = world.get::<&mut PlayerStats>(player) {
        let until_ms = now_ms + duration_ms;
        stats.stunned_until_ms = stats.stunned_until_ms.max(until_ms);
        events.push(GameEvent::PlayerStunned { until_ms });
    }
}

/// Remove killed enemies and hand out XP and item drops.
pub fn resolve_kills(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: Entity,
    kills: Vec<Kill>,
    balance: &Balance,
    events: &mut Vec<GameEvent>,
) {
    for kill in kills {
        if world.despawn(kill.entity).is_err() {
            // Already removed by an earlier hit this tick.
            continue;
        }
        events.push(GameEvent::EnemyKilled {
            archetype: kill.archetype,
            xp: kill.xp,
        });

        let kills_so_far = grant_kill(world, player, kill.xp, events);

        if kill.archetype.is_none() {
            drop_item(world, ItemKind::SuperHealthPotion, kill.position, events);
        }
        if balance.item_drop_rate > 0 && kills_so_far % balance.item_drop_rate == 0 {
            let kind = roll_drop(rng, balance.super_health_drop_chance);
            drop_item(world, kind, kill.position, events);
        }
    }
}

/// Pick the kind of a periodic drop.
fn roll_drop(rng: &mut ChaCha8Rng, super_chance: f64) -> ItemKind {
    if rng.gen_bool(super_chance.clamp(0.0, 1.0)) {
        return ItemKind::SuperHealthPotion;
    }
    match rng.gen_range(0..3) {
        0 => ItemKind::HealthPotion,
        1 => ItemKind::ManaPotion,
        _ => ItemKind::GoldCoin,
    }
}

fn drop_item(world: &mut World, kind: ItemKind, position: Position, events: &mut Vec<GameEvent>) {
    world_setup::spawn_ground_item(world, kind, position);
    events.push(GameEvent::ItemDropped { kind, position });
}

/// Count the kill and award XP, leveling up as many times as the XP allows.
/// Returns the player's cumulative kill count.
fn grant_kill(world: &mut World, player: Entity, xp: u32, events: &mut Vec<GameEvent>) -> u32 {
    let Ok(mut query) =
        world.query_one::<(&mut Health, &mut Mana, &mut PlayerStats, &mut Buffs)>(player)
    else {
        return 0;
    };
    let Some((health, mana, stats, buffs)) = query.get() else {
        return 0;
    };

    stats.kills += 1;
    stats.xp += xp;
    while stats.xp >= stats.xp_to_next_level {
        stats.xp -= stats.xp_to_next_level;
        stats.level += 1;
        level_up(health, mana, buffs);
        info!(level = stats.level, "Player leveled up");
        events.push(GameEvent::PlayerLevelUp { level: stats.level });
    }
    stats.kills
}

/// Grow max health (up to the player cap) and restore some health and mana.
fn level_up(health: &mut Health, mana: &mut Mana, buffs: &mut Buffs) {
    match buffs.max_health_boost.as_mut() {
        // The growth lands once the boost wears off.
        Some(boost) => {
            boost.base_max = (boost.base_max + PLAYER_HEALTH_REGEN).min(PLAYER_MAX_HEALTH);
        }
        None => health.max = (health.max + PLAYER_HEALTH_REGEN).min(PLAYER_MAX_HEALTH),
    }
    health.current = (health.current + PLAYER_HEALTH_REGEN).min(health.max);
    mana.current = (mana.current + PLAYER_MANA_REGEN).min(mana.max);
}
