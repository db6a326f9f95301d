//! Session state shared between the game loop thread and its drivers.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tracing::warn;

use emberfall_core::commands::PlayerCommand;
use emberfall_core::state::GameStateSnapshot;
use emberfall_core::sync::PeerUpdate;

use crate::client::{PeerLink, RelayEvent};
use crate::error::NetError;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    Player(PlayerCommand),
    /// State mirrored from another peer.
    Peer(PeerUpdate),
    /// Start publishing local state through this relay link.
    Link(PeerLink),
    /// The relay connection is gone. Ends the session.
    Disconnected,
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

impl From<PlayerCommand> for GameLoopCommand {
    fn from(command: PlayerCommand) -> Self {
        GameLoopCommand::Player(command)
    }
}

impl From<PeerUpdate> for GameLoopCommand {
    fn from(update: PeerUpdate) -> Self {
        GameLoopCommand::Peer(update)
    }
}

impl From<RelayEvent> for GameLoopCommand {
    fn from(event: RelayEvent) -> Self {
        match event {
            RelayEvent::Peer(update) => GameLoopCommand::Peer(update),
            RelayEvent::Closed => GameLoopCommand::Disconnected,
        }
    }
}

/// Latest snapshot, written by the game loop after every tick.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

/// Handle to a running game loop thread.
pub struct Session {
    pub(crate) command_tx: mpsc::Sender<GameLoopCommand>,
    pub(crate) latest_snapshot: SharedSnapshot,
    pub(crate) thread: Option<JoinHandle<()>>,
}

impl Session {
    /// Sender for other producers (e.g. the relay client).
    pub fn command_sender(&self) -> mpsc::Sender<GameLoopCommand> {
        self.command_tx.clone()
    }

    pub fn send(&self, command: impl Into<GameLoopCommand>) -> Result<(), NetError> {
        self.command_tx
            .send(command.into())
            .map_err(|_| NetError::Closed("game loop"))
    }

    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|snapshot| snapshot.clone())
    }

    /// True once the game loop thread has exited, on shutdown or relay loss.
    pub fn is_finished(&self) -> bool {
        self.thread
            .as_ref()
            .map_or(true, |thread| thread.is_finished())
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn shutdown(mut self) {
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Game loop thread panicked");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert!(matches!(
            GameLoopCommand::from(PlayerCommand::Pause),
            GameLoopCommand::Player(PlayerCommand::Pause)
        ));
        let update = PeerUpdate::PlayerLeft {
            player_id: "p".into(),
        };
        assert!(matches!(
            GameLoopCommand::from(update),
            GameLoopCommand::Peer(PeerUpdate::PlayerLeft { .. })
        ));
        assert!(matches!(
            GameLoopCommand::from(RelayEvent::Closed),
            GameLoopCommand::Disconnected
        ));
    }
}
