//! Simulation engine for EMBERFALL.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for whoever drives it.

pub mod autopilot;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod leaderboard;
pub mod npc_roster;
pub mod systems;
pub mod world_setup;

pub use config::{Balance, ConfigError, SimConfig};
pub use emberfall_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
