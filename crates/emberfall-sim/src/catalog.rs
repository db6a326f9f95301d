//! Item catalog stored as a JSON document.
//!
//! Reference data for tooling. Gameplay never reads it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use emberfall_core::constants::{GOLD_COIN_VALUE, HEALTH_POTION_AMOUNT, MANA_POTION_AMOUNT};
use emberfall_core::enums::{ItemKind, Rarity};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to access catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    entries: Vec<CatalogEntry>,
}

impl ItemCatalog {
    /// Catalog describing every item kind the game can drop.
    pub fn seeded() -> Self {
        let mut catalog = Self::default();
        for kind in [
            ItemKind::HealthPotion,
            ItemKind::ManaPotion,
            ItemKind::GoldCoin,
            ItemKind::SuperHealthPotion,
        ] {
            let (description, value) = match kind {
                ItemKind::HealthPotion => {
                    (format!("Restores {HEALTH_POTION_AMOUNT} health."), 15)
                }
                ItemKind::ManaPotion => (format!("Restores {MANA_POTION_AMOUNT} mana."), 15),
                ItemKind::GoldCoin => (format!("Worth {GOLD_COIN_VALUE} gold."), GOLD_COIN_VALUE),
                ItemKind::SuperHealthPotion => (
                    "Triples max health for a short time.".to_string(),
                    120,
                ),
            };
            catalog.insert(kind.display_name(), &description, kind.rarity(), value);
        }
        catalog
    }

    /// Add an entry and return its id. Ids start at 1 and are never reused.
    pub fn insert(&mut self, name: &str, description: &str, rarity: Rarity, value: u32) -> u32 {
        let id = self.entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        self.entries.push(CatalogEntry {
            id,
            name: name.to_string(),
            description: description.to_string(),
            rarity,
            value,
        });
        id
    }

    pub fn all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let io_err = |source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }

    /// Load the catalog at `path`, writing the seeded catalog there first if
    /// the file does not exist.
    pub fn load_or_seed(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            return Self::load(path);
        }
        let catalog = Self::seeded();
        catalog.save(path)?;
        Ok(catalog)
    }
}
