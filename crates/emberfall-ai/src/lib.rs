//! Enemy AI for EMBERFALL.
//!
//! Implements the boss state machine, regular enemy chase behavior,
//! archetype profiles and round composition.

pub mod chase;
pub mod fsm;
pub mod profiles;
pub mod waves;

pub use emberfall_core as core;
