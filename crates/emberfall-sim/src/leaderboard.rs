//! Flat-file leaderboard: one `name,rounds` line per finished game.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("Failed to read leaderboard {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write leaderboard {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub rounds: u32,
}

impl LeaderboardEntry {
    pub fn new(name: &str, rounds: u32) -> Self {
        // The file format has no quoting.
        let name: String = name.chars().filter(|c| *c != ',' && *c != '\n').collect();
        Self {
            name: name.trim().to_string(),
            rounds,
        }
    }

    fn to_line(&self) -> String {
        format!("{},{}\n", self.name, self.rounds)
    }

    fn parse(line: &str) -> Option<Self> {
        let (name, rounds) = line.rsplit_once(',')?;
        let rounds = rounds.trim().parse().ok()?;
        Some(Self {
            name: name.trim().to_string(),
            rounds,
        })
    }
}

/// Append-only leaderboard stored at a fixed path.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
}

impl Leaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        let write_err = |source| LeaderboardError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(entry.to_line().as_bytes()).map_err(write_err)
    }

    /// All entries, best first. Ties keep file order. A missing file is an
    /// empty leaderboard.
    pub fn load(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LeaderboardError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut entries = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match LeaderboardEntry::parse(line) {
                Some(entry) => entries.push(entry),
                None => warn!(line = index + 1, "Skipping malformed leaderboard line"),
            }
        }
        entries.sort_by(|a, b| b.rounds.cmp(&a.rounds));
        Ok(entries)
    }

    pub fn top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut entries = self.load()?;
        entries.truncate(n);
        Ok(entries)
    }
}
