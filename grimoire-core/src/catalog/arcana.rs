//! The major arcana used on the draw table.
//!
//! Each card carries flavor text for prophecies and a [`WordFilter`] that
//! picks the words studied when the card leads a reading.

use crate::filter::WordFilter;
use crate::catalog::{PartOfSpeech, Theme};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a major arcana card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcanaId {
    Fool,
    Magician,
    HighPriestess,
    Empress,
    Lovers,
    Chariot,
    Star,
    Moon,
}

/// Catalog entry for a tarot card.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ArcanaData {
    pub id: ArcanaId,
    pub name: &'static str,
    /// Roman numeral printed on the card face.
    pub numeral: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub filter: WordFilter,
    pub keyword: &'static str,
    pub element: &'static str,
    /// Prophecy text; `{word}` is replaced by the lucky word.
    pub prophecy: &'static str,
}

impl ArcanaId {
    /// The full arcana catalog, in numeral order.
    pub const ALL: [ArcanaId; 8] = [
        ArcanaId::Fool,
        ArcanaId::Magician,
        ArcanaId::HighPriestess,
        ArcanaId::Empress,
        ArcanaId::Lovers,
        ArcanaId::Chariot,
        ArcanaId::Star,
        ArcanaId::Moon,
    ];

    /// Short identifier used on the command line and in share cards.
    pub fn slug(self) -> &'static str {
        match self {
            ArcanaId::Fool => "fool",
            ArcanaId::Magician => "magician",
            ArcanaId::HighPriestess => "high-priestess",
            ArcanaId::Empress => "empress",
            ArcanaId::Lovers => "lovers",
            ArcanaId::Chariot => "chariot",
            ArcanaId::Star => "star",
            ArcanaId::Moon => "moon",
        }
    }

    /// Get the catalog entry for this card.
    pub fn data(self) -> ArcanaData {
        match self {
            ArcanaId::Fool => ArcanaData {
                id: self,
                name: "The Fool",
                numeral: "0",
                color: "#f2c94c",
                icon: "feather",
                filter: WordFilter::All,
                keyword: "beginnings",
                element: "Air",
                prophecy: "A first step taken lightly carries you further than you think. Let \"{word}\" be the word you pack for the road.",
            },
            ArcanaId::Magician => ArcanaData {
                id: self,
                name: "The Magician",
                numeral: "I",
                color: "#eb5757",
                icon: "wand",
                filter: WordFilter::PartOfSpeech(PartOfSpeech::Verb),
                keyword: "will",
                element: "Fire",
                prophecy: "What you name, you can shape. Speak \"{word}\" aloud and watch the day rearrange itself.",
            },
            ArcanaId::HighPriestess => ArcanaData {
                id: self,
                name: "The High Priestess",
                numeral: "II",
                color: "#56ccf2",
                icon: "moon-star",
                filter: WordFilter::MinLength(10),
                keyword: "intuition",
                element: "Water",
                prophecy: "Long words hide old secrets. Sit quietly with \"{word}\" and its meaning will surface on its own.",
            },
            ArcanaId::Empress => ArcanaData {
                id: self,
                name: "The Empress",
                numeral: "III",
                color: "#6fcf97",
                icon: "leaf",
                filter: WordFilter::Theme(Theme::Nature),
                keyword: "abundance",
                element: "Earth",
                prophecy: "Something you planted quietly is ready to bloom. Tend \"{word}\" and it will feed you for seasons.",
            },
            ArcanaId::Lovers => ArcanaData {
                id: self,
                name: "The Lovers",
                numeral: "VI",
                color: "#f78fb3",
                icon: "heart",
                filter: WordFilter::Theme(Theme::Heart),
                keyword: "union",
                element: "Air",
                prophecy: "Two paths meet today. Offer \"{word}\" to someone who needs it and it returns doubled.",
            },
            ArcanaId::Chariot => ArcanaData {
                id: self,
                name: "The Chariot",
                numeral: "VII",
                color: "#bb6bd9",
                icon: "chariot",
                filter: WordFilter::Theme(Theme::Motion),
                keyword: "momentum",
                element: "Water",
                prophecy: "Hold the reins and keep moving. \"{word}\" is the wheel that will not stop turning for you.",
            },
            ArcanaId::Star => ArcanaData {
                id: self,
                name: "The Star",
                numeral: "XVII",
                color: "#9ad0ff",
                icon: "star",
                filter: WordFilter::Theme(Theme::Light),
                keyword: "hope",
                element: "Air",
                prophecy: "After the storm the sky is wide open. Follow \"{word}\" like a light on the horizon.",
            },
            ArcanaId::Moon => ArcanaData {
                id: self,
                name: "The Moon",
                numeral: "XVIII",
                color: "#8e9aaf",
                icon: "moon",
                filter: WordFilter::Theme(Theme::Shadow),
                keyword: "mystery",
                element: "Water",
                prophecy: "Not everything is as it seems tonight. Let \"{word}\" guide you through the half-light.",
            },
        }
    }
}

impl std::str::FromStr for ArcanaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|id| id.slug() == s)
            .ok_or_else(|| format!("unknown arcana: {s}"))
    }
}

impl fmt::Display for ArcanaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::vocabulary;

    #[test]
    fn test_every_filter_matches_some_words() {
        for id in ArcanaId::ALL {
            let matches = id.data().filter.apply(vocabulary());
            assert!(!matches.is_empty(), "{id} filter matched nothing");
        }
    }

    #[test]
    fn test_prophecy_templates_take_a_word() {
        for id in ArcanaId::ALL {
            assert!(id.data().prophecy.contains("{word}"), "{id} template");
        }
    }

    #[test]
    fn test_parse_slug_variants() {
        assert_eq!("high priestess".parse::<ArcanaId>(), Ok(ArcanaId::HighPriestess));
        assert_eq!("STAR".parse::<ArcanaId>(), Ok(ArcanaId::Star));
        assert!("tower".parse::<ArcanaId>().is_err());
    }
}
