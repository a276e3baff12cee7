//! The grimoire shelf shown in the library.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mastery tier a grimoire belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Realm {
    Apprentice,
    Adept,
    Wayfarer,
    Scholar,
    Archmage,
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Realm::Apprentice => "Apprentice",
            Realm::Adept => "Adept",
            Realm::Wayfarer => "Wayfarer",
            Realm::Scholar => "Scholar",
            Realm::Archmage => "Archmage",
        };
        f.write_str(name)
    }
}

/// Identifier of a grimoire in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrimoireId {
    HearthstonePrimer,
    EmberCodex,
    WayfarersAtlas,
    ScholarsLantern,
    ArchmagesTome,
}

/// Catalog entry for a grimoire.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GrimoireData {
    pub id: GrimoireId,
    pub title: &'static str,
    pub realm: Realm,
    pub word_count: u32,
    /// 1 (gentle) through 5 (arcane).
    pub difficulty: u8,
    pub color: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl GrimoireId {
    /// Every grimoire, in shelf order.
    pub const ALL: [GrimoireId; 5] = [
        GrimoireId::HearthstonePrimer,
        GrimoireId::EmberCodex,
        GrimoireId::WayfarersAtlas,
        GrimoireId::ScholarsLantern,
        GrimoireId::ArchmagesTome,
    ];

    /// Short identifier used on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            GrimoireId::HearthstonePrimer => "hearthstone",
            GrimoireId::EmberCodex => "ember",
            GrimoireId::WayfarersAtlas => "wayfarer",
            GrimoireId::ScholarsLantern => "lantern",
            GrimoireId::ArchmagesTome => "archmage",
        }
    }

    /// Look a grimoire up by its slug, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|id| id.slug() == s)
    }

    /// Get the catalog entry for this grimoire.
    pub fn data(self) -> GrimoireData {
        match self {
            GrimoireId::HearthstonePrimer => GrimoireData {
                id: self,
                title: "Hearthstone Primer",
                realm: Realm::Apprentice,
                word_count: 1500,
                difficulty: 1,
                color: "#d9a441",
                icon: "flame",
                description: "Everyday roots for the first steps of study, read by firelight.",
            },
            GrimoireId::EmberCodex => GrimoireData {
                id: self,
                title: "Codex of Ember",
                realm: Realm::Adept,
                word_count: 3500,
                difficulty: 2,
                color: "#c4572f",
                icon: "book-open",
                description: "Common Latin and Greek stems that power most academic prose.",
            },
            GrimoireId::WayfarersAtlas => GrimoireData {
                id: self,
                title: "Wayfarer's Atlas",
                realm: Realm::Wayfarer,
                word_count: 5500,
                difficulty: 3,
                color: "#3f8f7a",
                icon: "compass",
                description: "Vocabulary for travel, study abroad and the wider world.",
            },
            GrimoireId::ScholarsLantern => GrimoireData {
                id: self,
                title: "Scholar's Lantern",
                realm: Realm::Scholar,
                word_count: 8000,
                difficulty: 4,
                color: "#4a5fb0",
                icon: "lamp",
                description: "Dense reading-list words with layered prefixes and suffixes.",
            },
            GrimoireId::ArchmagesTome => GrimoireData {
                id: self,
                title: "Archmage's Tome",
                realm: Realm::Archmage,
                word_count: 12000,
                difficulty: 5,
                color: "#7b3fa8",
                icon: "sparkles",
                description: "Rare and literary words for those who have mastered the rest.",
            },
        }
    }
}

impl fmt::Display for GrimoireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data().title)
    }
}
