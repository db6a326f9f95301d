//! Core types and definitions for EMBERFALL.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, items and constants.
//! It has no dependency on the ECS or any runtime.

pub mod actor;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod items;
pub mod state;
pub mod sync;
pub mod types;
