//! Player commands fed into the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session ---
    /// Start a new game from the main menu or after game over.
    StartGame { player_name: String },
    Pause,
    Resume,
    /// Return to the main menu from game over.
    ReturnToMenu,

    // --- Movement ---
    /// Set the walking direction. Components are clamped to [-1, 1]; the
    /// direction is held until the next `Move` or `Stop`.
    Move { dx: f64, dy: f64 },
    Stop,

    // --- Combat ---
    Attack,
    SpecialAttack,
    Defend,

    // --- NPCs ---
    /// Start talking to the nearby NPC.
    Interact,
    /// Show the next dialogue line.
    AdvanceDialogue,

    // --- Inventory ---
    UseItem { slot: usize },
}
