//! Simulation constants and tuning parameters.
//!
//! Durations are in milliseconds, distances in map pixels, speeds in pixels
//! per tick.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

// --- Map ---

pub const MAP_WIDTH: f64 = 1920.0;
pub const MAP_HEIGHT: f64 = 1080.0;

/// Margin kept clear at the map edges when picking random enemy positions.
pub const SPAWN_EDGE_MARGIN: f64 = 50.0;

/// Margin kept clear at the map edges when placing the boss.
pub const BOSS_SPAWN_EDGE_MARGIN: f64 = 100.0;

/// Margin kept clear at the map edges when placing an NPC.
pub const NPC_SPAWN_EDGE_MARGIN: f64 = 200.0;

/// Minimum distance between a freshly spawned enemy and the player.
pub const MIN_SPAWN_DISTANCE: f64 = 300.0;

/// Position samples tried before falling back to the farthest map corner.
pub const SPAWN_POSITION_ATTEMPTS: u32 = 32;

// --- Player ---

pub const PLAYER_SPEED: f64 = 5.0;
pub const PLAYER_HEALTH: f64 = 100.0;
pub const PLAYER_MAX_HEALTH: f64 = 1000.0;
pub const PLAYER_MANA: f64 = 50.0;
pub const PLAYER_MAX_MANA: f64 = 300.0;
pub const PLAYER_SIZE: f64 = 64.0;

pub const PLAYER_ATTACK_COOLDOWN_MS: u64 = 100;
/// Extra reach of the basic attack box beyond the player's hitbox.
pub const PLAYER_ATTACK_REACH: f64 = 16.0;
pub const PLAYER_DAMAGE: f64 = 25.0;

pub const PLAYER_SPECIAL_DAMAGE: f64 = 65.0;
pub const PLAYER_SPECIAL_COOLDOWN_MS: u64 = 3000;
pub const PLAYER_SPECIAL_RADIUS: f64 = 200.0;
pub const PLAYER_MANA_COST: f64 = 10.0;

pub const PLAYER_DEFENSE_DURATION_MS: u64 = 2000;
/// Multiplier applied to incoming damage while defending.
pub const PLAYER_DEFENSE_REDUCTION: f64 = 0.5;

/// Damage bonus per level above 1 (fraction of base damage).
pub const PLAYER_DAMAGE_PER_LEVEL: f64 = 0.1;
pub const PLAYER_XP_TO_NEXT_LEVEL: u32 = 100;
/// Health restored on level-up.
pub const PLAYER_HEALTH_REGEN: f64 = 7.0;
/// Mana restored on level-up.
pub const PLAYER_MANA_REGEN: f64 = 15.0;

pub const INVENTORY_CAPACITY: usize = 10;

// --- Enemies ---

pub const ENEMY_SPEED: f64 = 2.0;
pub const ENEMY_HEALTH: f64 = 50.0;
pub const ENEMY_DAMAGE: f64 = 7.0;
pub const ENEMY_SIZE: f64 = 96.0;
pub const ENEMY_ATTACK_COOLDOWN_MS: u64 = 1000;
pub const ENEMY_FREEZE_DURATION_MS: u64 = 1500;

/// Enemy health growth per round above 1 (fraction of base).
pub const ENEMY_HEALTH_PER_ROUND: f64 = 0.15;
/// Enemy damage growth per round above 1 (fraction of base).
pub const ENEMY_DAMAGE_PER_ROUND: f64 = 0.1;

// --- Boss ---

pub const BOSS_BASE_HEALTH: f64 = 500.0;
pub const BOSS_HEALTH_PER_ROUND: f64 = 50.0;
pub const BOSS_BASE_DAMAGE: f64 = 30.0;
pub const BOSS_DAMAGE_PER_ROUND: f64 = 5.0;
pub const BOSS_SPEED: f64 = 1.5;
pub const BOSS_BASE_SCALE: f64 = 2.0;
pub const BOSS_SCALE_PER_ROUND: f64 = 0.05;
pub const BOSS_SIZE: f64 = 96.0;
pub const BOSS_ATTACK_COOLDOWN_MS: u64 = 1500;
pub const BOSS_SPECIAL_COOLDOWN_MS: u64 = 5000;
pub const BOSS_STUN_DURATION_MS: u64 = 2000;
/// Delay between the boss spawning and it becoming active.
pub const BOSS_SPAWN_DELAY_MS: u64 = 3000;
/// Player distance that wakes an idle boss.
pub const BOSS_AGGRO_RADIUS: f64 = 300.0;
/// Fraction of max health below which the boss is forced into its special.
pub const BOSS_SPECIAL_HEALTH_FRACTION: f64 = 0.5;
/// Speed multiplier while evading.
pub const BOSS_EVADE_SPEED_FACTOR: f64 = 2.0;
pub const BOSS_XP_REWARD: u32 = 200;

// --- Rounds ---

/// Enemies in round n: ROUND_BASE_ENEMIES + n.
pub const ROUND_BASE_ENEMIES: u32 = 3;
/// Every Nth round is a boss round.
pub const BOSS_ROUND_INTERVAL: u32 = 10;
/// Every Nth round brings an NPC.
pub const NPC_ROUND_INTERVAL: u32 = 3;
/// Wait between a cleared round and the next spawn burst.
pub const ROUND_DELAY_MS: u64 = 3000;

// --- Items ---

/// An item drops on every Nth cumulative kill.
pub const ITEM_DROP_RATE: u32 = 6;
pub const SUPER_HEALTH_DROP_CHANCE: f64 = 0.3;
pub const ITEM_EFFECT_DURATION_MS: u64 = 15_000;
pub const ITEM_PICKUP_SIZE: f64 = 32.0;
pub const HEALTH_POTION_AMOUNT: f64 = 30.0;
pub const MANA_POTION_AMOUNT: f64 = 25.0;
pub const GOLD_COIN_VALUE: u32 = 10;
/// Max-health multiplier of the Super Health Potion.
pub const SUPER_HEALTH_FACTOR: f64 = 3.0;

// --- NPCs ---

pub const NPC_DIALOGUE_DELAY_MS: u64 = 2000;
pub const NPC_INTERACTION_DISTANCE: f64 = 100.0;

// --- Network ---

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:5555";
