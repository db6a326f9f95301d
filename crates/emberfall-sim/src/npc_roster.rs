//! The fixed roster of NPCs that can appear on NPC rounds.

use rand::seq::SliceRandom;
use rand::Rng;

use emberfall_core::enums::ItemKind;

pub struct NpcTemplate {
    pub name: &'static str,
    pub dialogues: &'static [&'static str],
    pub reward: Option<ItemKind>,
}

pub static ROSTER: [NpcTemplate; 3] = [
    NpcTemplate {
        name: "Old Sage",
        dialogues: &[
            "The old times hide deep secrets...",
            "There was a war centuries ago, and its echoes still linger...",
            "If you wish to survive, learn to use your skills wisely.",
        ],
        reward: Some(ItemKind::ManaPotion),
    },
    NpcTemplate {
        name: "Mysterious Merchant",
        dialogues: &[
            "Hahaha! You look like you need supplies, young warrior...",
            "Not all that glitters is gold. Sometimes true power hides in the shadows.",
            "A good adventurer always carries a spare potion.",
        ],
        reward: Some(ItemKind::HealthPotion),
    },
    NpcTemplate {
        name: "Ruins Guardian",
        dialogues: &[
            "I have guarded this place longer than you can imagine...",
            "Beware! There are creatures in the depths that should not be woken.",
            "If you find a rune key, bring it to me. I can tell you more about what happened here.",
        ],
        reward: None,
    },
];

pub fn choose(rng: &mut impl Rng) -> &'static NpcTemplate {
    // ROSTER is non-empty.
    ROSTER.choose(rng).unwrap_or(&ROSTER[0])
}
