//! Networking and session plumbing for EMBERFALL.
//!
//! A tokio relay fans length-prefixed JSON frames out to every other peer.
//! Clients forward decoded updates over channels to a single game loop
//! thread that owns the simulation engine.

pub mod client;
pub mod error;
pub mod game_loop;
pub mod protocol;
pub mod relay;
pub mod state;

pub use emberfall_core as core;
pub use error::NetError;
