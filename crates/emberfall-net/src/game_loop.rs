//! Game loop thread: runs the simulation engine at 60 Hz and publishes
//! snapshots.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands and peer updates arrive via an `mpsc` channel. The latest snapshot
//! is stored in shared state for polling. Once a relay link is handed over,
//! the local position (and, for the round authority, the enemy set) is
//! published every few ticks.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use emberfall_core::constants::TICK_RATE;
use emberfall_core::state::GameStateSnapshot;
use emberfall_sim::leaderboard::Leaderboard;
use emberfall_sim::{SimConfig, SimulationEngine};

use crate::client::PeerLink;
use crate::error::NetError;
use crate::protocol::NetMessage;
use crate::state::{GameLoopCommand, Session, SharedSnapshot};

/// Duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Ticks between two publications to the relay (20 Hz).
const PUBLISH_INTERVAL_TICKS: u64 = 3;

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(
    config: SimConfig,
    leaderboard: Option<Leaderboard>,
) -> Result<Session, NetError> {
    let (command_tx, command_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot: SharedSnapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("emberfall-game-loop".into())
        .spawn(move || {
            let mut engine = SimulationEngine::new(config);
            if let Some(leaderboard) = leaderboard {
                engine = engine.with_leaderboard(leaderboard);
            }
            run_game_loop(engine, command_rx, &shared);
        })?;

    Ok(Session {
        command_tx,
        latest_snapshot,
        thread: Some(thread),
    })
}

/// The game loop. Runs until Shutdown, relay loss or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    command_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    info!(authority = engine.is_authority(), "Game loop started");
    let mut link: Option<PeerLink> = None;
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        if !drain_commands(&mut engine, &command_rx, &mut link) {
            info!("Game loop stopped");
            return;
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Mirror local state to the other peers
        if snapshot.time.tick % PUBLISH_INTERVAL_TICKS == 0 {
            if let Some(active) = &link {
                if let Err(e) = publish(&engine, active) {
                    warn!(error = %e, "Relay link closed, ending session");
                    store(latest_snapshot, snapshot);
                    return;
                }
            }
        }

        // 4. Store latest snapshot for polling
        store(latest_snapshot, snapshot);

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

fn store(latest_snapshot: &Mutex<Option<GameStateSnapshot>>, snapshot: GameStateSnapshot) {
    if let Ok(mut lock) = latest_snapshot.lock() {
        *lock = Some(snapshot);
    }
}

/// Queue everything waiting on the channel. Returns false once the loop
/// should stop.
fn drain_commands(
    engine: &mut SimulationEngine,
    command_rx: &mpsc::Receiver<GameLoopCommand>,
    link: &mut Option<PeerLink>,
) -> bool {
    loop {
        match command_rx.try_recv() {
            Ok(GameLoopCommand::Player(command)) => engine.queue_command(command),
            Ok(GameLoopCommand::Peer(update)) => engine.apply_peer_message(update),
            Ok(GameLoopCommand::Link(new_link)) => {
                info!(player_id = new_link.player_id(), "Publishing to relay");
                *link = Some(new_link);
            }
            Ok(GameLoopCommand::Shutdown) => return false,
            Ok(GameLoopCommand::Disconnected) => {
                warn!("Relay connection lost, ending session");
                return false;
            }
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// Messages describing the local engine to the other peers.
pub fn outgoing_messages(engine: &SimulationEngine, player_id: &str) -> Vec<NetMessage> {
    let Some(position) = engine.local_player_position() else {
        return Vec::new();
    };
    if !engine.is_authority() {
        return vec![NetMessage::Move {
            player_id: player_id.to_string(),
            position,
        }];
    }
    let mut players = BTreeMap::new();
    players.insert(player_id.to_string(), position);
    vec![NetMessage::State {
        players,
        enemies: engine.enemy_sync(),
        round: engine.round(),
    }]
}

fn publish(engine: &SimulationEngine, link: &PeerLink) -> Result<(), NetError> {
    for message in outgoing_messages(engine, link.player_id()) {
        link.send(message)?;
    }
    Ok(())
}
