//! Word filtering strategies attached to arcana.

use crate::catalog::{PartOfSpeech, Theme, WordData};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which words a card draws into the study deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WordFilter {
    /// Every word in the vocabulary.
    All,
    /// Words tagged with a theme.
    Theme(Theme),
    /// Words of one grammatical category.
    PartOfSpeech(PartOfSpeech),
    /// Words with at least this many letters.
    MinLength(usize),
}

impl WordFilter {
    /// Whether a single word passes the filter.
    pub fn matches(&self, word: &WordData) -> bool {
        match self {
            WordFilter::All => true,
            WordFilter::Theme(theme) => word.has_theme(*theme),
            WordFilter::PartOfSpeech(pos) => word.part_of_speech == *pos,
            WordFilter::MinLength(min) => word.letter_count() >= *min,
        }
    }

    /// Keep the words that pass, preserving catalog order.
    pub fn apply(&self, words: &[WordData]) -> Vec<WordData> {
        words.iter().filter(|w| self.matches(w)).cloned().collect()
    }
}

impl fmt::Display for WordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordFilter::All => write!(f, "all words"),
            WordFilter::Theme(theme) => {
                write!(f, "{} words", format!("{theme:?}").to_lowercase())
            }
            WordFilter::PartOfSpeech(pos) => write!(f, "{pos} words"),
            WordFilter::MinLength(min) => write!(f, "words of {min}+ letters"),
        }
    }
}
