//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components and the round scheduler.

pub mod boss_ai;
pub mod cleanup;
pub mod combat;
pub mod enemy_ai;
pub mod items;
pub mod movement;
pub mod npc;
pub mod peers;
pub mod snapshot;
pub mod wave_spawner;
