//! Session deck construction.
//!
//! The deck studied during review is built from the lead card's filter,
//! padded by doubling, and seeded with one hidden arcana per reading slot.

use crate::catalog::{ArcanaId, WordData};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decks shorter than this are doubled until they reach it.
pub const MIN_DECK_LEN: usize = 6;

/// The three cards of a reading, in draw order.
///
/// Slot 0 is the foundation card: it picks the study words and the
/// prophecy. In the ritual the slots read as past, present and future.
pub type Reading = [ArcanaId; 3];

/// A reading card hidden behind a study word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenTarot {
    /// Slot of the reading this tag unlocks.
    pub position: usize,
    pub arcana: ArcanaId,
}

/// A word in the session deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCard {
    pub word: WordData,
    pub hidden: Option<HiddenTarot>,
}

impl SessionCard {
    fn plain(word: WordData) -> Self {
        Self { word, hidden: None }
    }
}

/// Build the study deck for a reading.
pub fn build_session_deck<R: Rng + ?Sized>(
    reading: &Reading,
    vocabulary: &[WordData],
    rng: &mut R,
) -> Vec<SessionCard> {
    let lead = reading[0].data();
    let mut words = lead.filter.apply(vocabulary);
    if words.is_empty() {
        debug!(arcana = %reading[0], "filter matched nothing, using full vocabulary");
        words = vocabulary.to_vec();
    }

    let mut deck: Vec<SessionCard> = words.into_iter().map(SessionCard::plain).collect();
    while !deck.is_empty() && deck.len() < MIN_DECK_LEN {
        deck.extend_from_within(..);
    }

    let tags = reading.len().min(deck.len());
    for (position, slot) in index::sample(rng, deck.len(), tags).into_iter().enumerate() {
        deck[slot].hidden = Some(HiddenTarot {
            position,
            arcana: reading[position],
        });
    }

    debug!(len = deck.len(), tags, "session deck built");
    deck
}

/// Pick the lucky word shown with the prophecy.
pub fn lucky_word<'a, R: Rng + ?Sized>(deck: &'a [SessionCard], rng: &mut R) -> Option<&'a WordData> {
    deck.choose(rng).map(|card| &card.word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{vocabulary, PartOfSpeech, Theme};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn word(text: &str, themes: Vec<Theme>) -> WordData {
        WordData {
            word: text.to_string(),
            phonetic: String::new(),
            part_of_speech: PartOfSpeech::Noun,
            meaning: format!("meaning of {text}"),
            components: Vec::new(),
            origin_image: String::new(),
            logic_chain: String::new(),
            nuance: String::new(),
            quote: None,
            themes,
        }
    }

    fn tagged_positions(deck: &[SessionCard]) -> Vec<usize> {
        let mut positions: Vec<_> = deck
            .iter()
            .filter_map(|c| c.hidden.map(|h| h.position))
            .collect();
        positions.sort_unstable();
        positions
    }

    #[test]
    fn test_two_matches_double_to_eight() {
        // Seven words, two of them tagged Shadow for The Moon.
        let catalog = vec![
            word("dusk", vec![Theme::Shadow]),
            word("dawn", vec![Theme::Light]),
            word("gloom", vec![Theme::Shadow]),
            word("bloom", vec![Theme::Nature]),
            word("heart", vec![Theme::Heart]),
            word("wheel", vec![Theme::Motion]),
            word("crown", vec![Theme::Power]),
        ];
        let reading = [ArcanaId::Moon, ArcanaId::Star, ArcanaId::Fool];
        let mut rng = StdRng::seed_from_u64(7);

        let deck = build_session_deck(&reading, &catalog, &mut rng);

        assert_eq!(deck.len(), 8);
        let words: Vec<_> = deck.iter().map(|c| c.word.word.as_str()).collect();
        assert_eq!(
            words,
            ["dusk", "gloom", "dusk", "gloom", "dusk", "gloom", "dusk", "gloom"]
        );
        assert_eq!(tagged_positions(&deck), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_filter_falls_back_to_full_catalog() {
        let catalog = vec![
            word("ember", vec![Theme::Power]),
            word("cinder", vec![Theme::Power]),
            word("ash", vec![Theme::Time]),
        ];
        // The Lovers look for Heart words; there are none.
        let reading = [ArcanaId::Lovers, ArcanaId::Moon, ArcanaId::Star];
        let mut rng = StdRng::seed_from_u64(1);

        let deck = build_session_deck(&reading, &catalog, &mut rng);

        assert_eq!(deck.len(), 6);
        assert!(deck.iter().any(|c| c.word.word == "ash"));
    }

    #[test]
    fn test_tags_name_their_reading_slot() {
        let reading = [ArcanaId::Star, ArcanaId::Star, ArcanaId::Moon];
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let deck = build_session_deck(&reading, vocabulary(), &mut rng);

            assert!(deck.len() >= MIN_DECK_LEN);
            assert_eq!(tagged_positions(&deck), vec![0, 1, 2]);
            for hidden in deck.iter().filter_map(|c| c.hidden) {
                assert_eq!(hidden.arcana, reading[hidden.position]);
            }
        }
    }

    #[test]
    fn test_large_filter_is_not_padded() {
        let reading = [ArcanaId::Fool, ArcanaId::Moon, ArcanaId::Star];
        let mut rng = StdRng::seed_from_u64(3);
        let deck = build_session_deck(&reading, vocabulary(), &mut rng);
        assert_eq!(deck.len(), vocabulary().len());
    }

    #[test]
    fn test_lucky_word_comes_from_deck() {
        let reading = [ArcanaId::Empress, ArcanaId::Moon, ArcanaId::Star];
        let mut rng = StdRng::seed_from_u64(11);
        let deck = build_session_deck(&reading, vocabulary(), &mut rng);

        let lucky = lucky_word(&deck, &mut rng).unwrap();
        assert!(deck.iter().any(|c| &c.word == lucky));
        assert!(lucky_word(&[], &mut rng).is_none());
    }
}
