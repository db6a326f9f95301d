//! Items and their one-shot effects.

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::constants::*;
use crate::enums::{ItemKind, Rarity};

/// A collectible item. Applying it consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub name: String,
    pub rarity: Rarity,
}

/// What an item did when applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ItemEffect {
    Healed { amount: f64 },
    ManaRestored { amount: f64 },
    GoldGained { amount: u32 },
    MaxHealthBoosted { factor: f64, until_ms: u64 },
    /// The target lacked the capability the item needs.
    NoEffect,
}

impl ItemKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::HealthPotion => "Health Potion",
            ItemKind::ManaPotion => "Mana Potion",
            ItemKind::GoldCoin => "Gold Coin",
            ItemKind::SuperHealthPotion => "Super Health Potion",
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            ItemKind::HealthPotion | ItemKind::ManaPotion => Rarity::Common,
            ItemKind::GoldCoin => Rarity::Uncommon,
            ItemKind::SuperHealthPotion => Rarity::Epic,
        }
    }
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            rarity: kind.rarity(),
        }
    }

    /// Apply the item's effect to `target` and destroy the item.
    pub fn apply(self, target: &mut impl Actor, now_ms: u64) -> ItemEffect {
        match self.kind {
            ItemKind::HealthPotion => {
                let before = target.health().current;
                target.heal(HEALTH_POTION_AMOUNT);
                ItemEffect::Healed {
                    amount: target.health().current - before,
                }
            }
            ItemKind::ManaPotion => {
                if target.restore_mana(MANA_POTION_AMOUNT) {
                    ItemEffect::ManaRestored {
                        amount: MANA_POTION_AMOUNT,
                    }
                } else {
                    ItemEffect::NoEffect
                }
            }
            ItemKind::GoldCoin => {
                if target.add_gold(GOLD_COIN_VALUE) {
                    ItemEffect::GoldGained {
                        amount: GOLD_COIN_VALUE,
                    }
                } else {
                    ItemEffect::NoEffect
                }
            }
            ItemKind::SuperHealthPotion => {
                let until_ms = now_ms + ITEM_EFFECT_DURATION_MS;
                if target.boost_max_health(SUPER_HEALTH_FACTOR, until_ms) {
                    ItemEffect::MaxHealthBoosted {
                        factor: SUPER_HEALTH_FACTOR,
                        until_ms,
                    }
                } else {
                    ItemEffect::NoEffect
                }
            }
        }
    }
}
