//! emberfall: relay server and headless session driver.
//!
//! Usage:
//!   emberfall serve --addr 127.0.0.1:5555
//!   emberfall simulate --seed 7 --ticks 36000 --name Ayla
//!   emberfall simulate --relay 127.0.0.1:5555 --follower
//!   emberfall leaderboard --top 10
//!   emberfall catalog --path items.json

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use emberfall_core::commands::PlayerCommand;
use emberfall_core::constants::DEFAULT_SERVER_ADDR;
use emberfall_core::enums::GamePhase;
use emberfall_core::state::GameStateSnapshot;
use emberfall_net::client::RelayClient;
use emberfall_net::game_loop::{spawn_game_loop, TICK_DURATION};
use emberfall_net::relay::RelayServer;
use emberfall_net::state::GameLoopCommand;
use emberfall_sim::autopilot::Autopilot;
use emberfall_sim::catalog::ItemCatalog;
use emberfall_sim::leaderboard::Leaderboard;
use emberfall_sim::{SimConfig, SimulationEngine};

const DEFAULT_LEADERBOARD: &str = "leaderboard.txt";
const DEFAULT_CATALOG: &str = "items.json";
/// One hour of play at 60 Hz.
const DEFAULT_TICKS: u64 = 216_000;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        bail!("missing command");
    }

    match args[1].as_str() {
        "serve" => cmd_serve(&args[2..]).await,
        "simulate" => cmd_simulate(&args[2..]).await,
        "leaderboard" => cmd_leaderboard(&args[2..]),
        "catalog" => cmd_catalog(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {other}");
        }
    }
}

fn print_usage() {
    eprintln!(
        "emberfall: EMBERFALL relay and headless driver\n\
         \n\
         Commands:\n\
         \n\
         serve        Run the broadcast relay\n\
         \n\
           --addr <host:port>   Listen address (default: {DEFAULT_SERVER_ADDR})\n\
         \n\
         simulate     Play a session with the autopilot\n\
         \n\
           --seed <N>           RNG seed (default: from config, else 42)\n\
           --ticks <N>          Tick limit (default: {DEFAULT_TICKS})\n\
           --name <name>        Player name (default: autopilot)\n\
           --config <path>      JSON config file\n\
           --leaderboard <path> Record the result in this file\n\
           --relay <host:port>  Play in real time through a relay\n\
           --follower           Mirror enemies instead of spawning them\n\
         \n\
         leaderboard  Print the best scores\n\
         \n\
           --path <path>        Leaderboard file (default: {DEFAULT_LEADERBOARD})\n\
           --top <N>            Entries to show (default: 10)\n\
         \n\
         catalog      Print the item catalog, creating it if missing\n\
         \n\
           --path <path>        Catalog file (default: {DEFAULT_CATALOG})\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    flag_value(args, flag)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value for {flag}: {v}")))
        .transpose()
}

// --- Serve command ---

async fn cmd_serve(args: &[String]) -> Result<()> {
    let addr = flag_value(args, "--addr").unwrap_or(DEFAULT_SERVER_ADDR);
    let server = RelayServer::bind(addr).await?;
    server.run().await?;
    Ok(())
}

// --- Simulate command ---

async fn cmd_simulate(args: &[String]) -> Result<()> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => SimConfig::from_json_file(Path::new(path))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_flag::<u64>(args, "--seed")? {
        config.seed = seed;
    }
    if has_flag(args, "--follower") {
        config.authority = false;
    }
    let ticks = parse_flag::<u64>(args, "--ticks")?.unwrap_or(DEFAULT_TICKS);
    let name = flag_value(args, "--name").unwrap_or("autopilot").to_string();
    let leaderboard = flag_value(args, "--leaderboard").map(Leaderboard::new);

    let last = match flag_value(args, "--relay") {
        Some(relay) => run_networked(config, leaderboard, &name, relay, ticks).await?,
        None => run_headless(config, leaderboard, &name, ticks),
    };
    print_summary(&last);
    Ok(())
}

/// Run as fast as possible, no relay.
fn run_headless(
    config: SimConfig,
    leaderboard: Option<Leaderboard>,
    name: &str,
    ticks: u64,
) -> GameStateSnapshot {
    info!(seed = config.seed, ticks, "Headless session");
    let mut engine = SimulationEngine::new(config);
    if let Some(leaderboard) = leaderboard {
        engine = engine.with_leaderboard(leaderboard);
    }
    let mut pilot = Autopilot::new();
    engine.queue_command(PlayerCommand::StartGame {
        player_name: name.to_string(),
    });

    let mut snapshot = engine.tick();
    while snapshot.time.tick < ticks && snapshot.phase == GamePhase::Active {
        engine.queue_commands(pilot.decide(&snapshot));
        snapshot = engine.tick();
    }
    snapshot
}

/// Run in real time on the game loop thread, mirrored through a relay.
async fn run_networked(
    config: SimConfig,
    leaderboard: Option<Leaderboard>,
    name: &str,
    relay: &str,
    ticks: u64,
) -> Result<GameStateSnapshot> {
    let session = spawn_game_loop(config, leaderboard)?;
    session.send(PlayerCommand::StartGame {
        player_name: name.to_string(),
    })?;

    let link = RelayClient::connect(
        relay,
        name,
        emberfall_sim::world_setup::map_center(),
        session.command_sender(),
    )
    .await?;
    session.send(GameLoopCommand::Link(link))?;

    let mut pilot = Autopilot::new();
    let mut interval = tokio::time::interval(TICK_DURATION);
    let mut last = GameStateSnapshot::default();
    loop {
        interval.tick().await;
        if session.is_finished() {
            warn!("Session ended: relay connection lost");
            if let Some(snapshot) = session.snapshot() {
                last = snapshot;
            }
            break;
        }
        let Some(snapshot) = session.snapshot() else {
            continue;
        };
        for command in pilot.decide(&snapshot) {
            // A failed send means the loop just exited; caught above.
            if session.send(command).is_err() {
                break;
            }
        }
        let done = snapshot.time.tick >= ticks || snapshot.phase == GamePhase::GameOver;
        last = snapshot;
        if done {
            break;
        }
    }
    session.shutdown();
    Ok(last)
}

fn print_summary(snapshot: &GameStateSnapshot) {
    let level = snapshot.player.as_ref().map_or(0, |p| p.level);
    println!(
        "phase={:?} ticks={} round={} rounds_cleared={} kills={} level={}",
        snapshot.phase,
        snapshot.time.tick,
        snapshot.round,
        snapshot.score.rounds_cleared,
        snapshot.score.kills,
        level
    );
}

// --- Leaderboard command ---

fn cmd_leaderboard(args: &[String]) -> Result<()> {
    let path = PathBuf::from(flag_value(args, "--path").unwrap_or(DEFAULT_LEADERBOARD));
    let top = parse_flag::<usize>(args, "--top")?.unwrap_or(10);
    let entries = Leaderboard::new(&path).top(top)?;
    if entries.is_empty() {
        println!("No scores yet in {}", path.display());
        return Ok(());
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!("{:>3}. {:<20} {}", rank + 1, entry.name, entry.rounds);
    }
    Ok(())
}

// --- Catalog command ---

fn cmd_catalog(args: &[String]) -> Result<()> {
    let path = PathBuf::from(flag_value(args, "--path").unwrap_or(DEFAULT_CATALOG));
    let catalog = ItemCatalog::load_or_seed(&path)?;
    for entry in catalog.all() {
        println!(
            "{:>3} {:<22} {:<10} {:>4}  {}",
            entry.id,
            entry.name,
            format!("{:?}", entry.rarity),
            entry.value,
            entry.description
        );
    }
    Ok(())
}
