//! Static reference data: grimoires, arcana, and the vocabulary.
//!
//! Everything here is immutable. Sessions select from the catalog but never
//! own or mutate it.

mod arcana;
mod grimoires;
mod words;

pub use arcana::{ArcanaData, ArcanaId};
pub use grimoires::{GrimoireData, GrimoireId, Realm};
pub use words::{vocabulary, Morpheme, WordData};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Thematic tag attached to vocabulary entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Shadow,
    Heart,
    Motion,
    Power,
    Nature,
    Time,
    Mind,
}

/// Grammatical category of a vocabulary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbrev = match self {
            PartOfSpeech::Noun => "n.",
            PartOfSpeech::Verb => "v.",
            PartOfSpeech::Adjective => "adj.",
        };
        f.write_str(abbrev)
    }
}
