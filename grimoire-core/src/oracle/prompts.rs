//! Prompts and structured-output schemas for the Claude oracle.

use super::{CardPassage, ChatTurn, OracleError, OracleTopic, TarotReading, WordEnrichment};
use crate::catalog::Morpheme;
use crate::deck::Reading;
use grimoire_macros::Tool;
use serde::Deserialize;

pub(crate) const ETYMOLOGIST_PROMPT: &str = "You are a patient etymologist who teaches \
English vocabulary through roots. Break words into prefixes, roots and suffixes, paint the \
picture those roots suggest, and connect that picture to the modern meaning in a short chain \
of steps. Keep every field brief and concrete.";

pub(crate) const SAGE_PROMPT: &str = "You are the Sage of the Grimoire, a warm and slightly \
mysterious tutor who helps a student remember English words. Answer in two to four sentences. \
Use the word's roots when they help. Stay in character but never invent false etymology.";

pub(crate) const ORACLE_PROMPT: &str = "You are the Oracle, a tarot reader who writes gentle, \
grounded readings. Never predict disasters, illness or death. Speak to the seeker directly, \
tie each card to its position, and end with a hopeful but honest synthesis.";

const POSITIONS: [&str; 3] = ["Past", "Present", "Future"];

/// Record the etymology breakdown of an English word
#[derive(Debug, Tool, Deserialize)]
#[tool(name = "record_etymology")]
pub(crate) struct EtymologyPayload {
    /// Prefixes, roots and suffixes, in the order they appear
    components: Vec<MorphemePayload>,
    /// The vivid scene the literal roots paint, one or two sentences
    origin_image: String,
    /// Arrow chain from the literal roots to the modern sense
    logic_chain: String,
    /// Modern meaning in plain English
    modern_meaning: String,
    /// A usage nuance or common confusion
    nuance: String,
    /// A short original sentence or quote using the word
    quote: Option<String>,
}

/// A single word part
#[derive(Debug, Tool, Deserialize)]
pub(crate) struct MorphemePayload {
    /// The prefix, root or suffix as written, e.g. "trans-"
    part: String,
    /// What the part means
    gloss: String,
}

impl From<EtymologyPayload> for WordEnrichment {
    fn from(payload: EtymologyPayload) -> Self {
        Self {
            components: payload
                .components
                .into_iter()
                .map(|m| Morpheme {
                    part: m.part,
                    gloss: m.gloss,
                })
                .collect(),
            origin_image: payload.origin_image,
            logic_chain: payload.logic_chain,
            modern_meaning: payload.modern_meaning,
            nuance: payload.nuance,
            quote: payload.quote.filter(|q| !q.trim().is_empty()),
        }
    }
}

/// Record a three-card tarot reading for the seeker
#[derive(Debug, Tool, Deserialize)]
#[tool(name = "record_reading")]
pub(crate) struct ReadingPayload {
    /// Evocative title for the whole reading, under eight words
    synthesis_title: String,
    /// Two or three sentences weaving the three cards together
    synthesis_content: String,
    /// Exactly three passages: past, present, future
    #[tool(items = 3)]
    cards: Vec<PassagePayload>,
    /// One short line capturing the mood of the reading
    vibe: String,
}

/// The passage for one card position
#[derive(Debug, Tool, Deserialize)]
pub(crate) struct PassagePayload {
    /// Short heading for the card in its position
    title: String,
    /// Two or three sentences interpreting the card
    content: String,
}

impl TryFrom<ReadingPayload> for TarotReading {
    type Error = OracleError;

    fn try_from(payload: ReadingPayload) -> Result<Self, Self::Error> {
        let count = payload.cards.len();
        let cards: [PassagePayload; 3] = payload
            .cards
            .try_into()
            .map_err(|_| OracleError::Malformed(format!("expected 3 card passages, got {count}")))?;

        Ok(Self {
            synthesis_title: payload.synthesis_title,
            synthesis_content: payload.synthesis_content,
            cards: cards.map(|p| CardPassage {
                title: p.title,
                content: p.content,
            }),
            vibe: payload.vibe,
        })
    }
}

pub(crate) fn etymology_request(word: &str) -> String {
    format!("Break down the English word \"{word}\" for a student.")
}

/// The chat message: prior turns as `speaker: text` lines, then the new question.
pub(crate) fn chat_request(history: &[ChatTurn], message: &str) -> String {
    let mut prompt = String::new();
    if !history.is_empty() {
        prompt.push_str("Conversation so far:\n");
        for turn in history {
            prompt.push_str(&turn.to_string());
            prompt.push('\n');
        }
        prompt.push('\n');
    }
    prompt.push_str("seeker: ");
    prompt.push_str(message);
    prompt
}

pub(crate) fn reading_request(cards: &Reading, topic: OracleTopic) -> String {
    let mut prompt = format!(
        "The seeker asks about {} ({}).\nThey drew:\n",
        topic.label(),
        topic.focus()
    );
    for (position, arcana) in POSITIONS.iter().zip(cards) {
        let data = arcana.data();
        prompt.push_str(&format!(
            "- {position}: {} ({}), keyword \"{}\", element {}\n",
            data.name, data.numeral, data.keyword, data.element
        ));
    }
    prompt.push_str("Write the reading.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ArcanaId;
    use serde_json::json;

    #[test]
    fn test_reading_schema_pins_three_cards() {
        let schema = ReadingPayload::input_schema();
        assert_eq!(ReadingPayload::tool_name(), "record_reading");
        assert_eq!(schema["properties"]["cards"]["type"], "array");
        assert_eq!(schema["properties"]["cards"]["minItems"], 3);
        assert_eq!(schema["properties"]["cards"]["maxItems"], 3);
        assert_eq!(
            schema["properties"]["cards"]["items"]["properties"]["title"]["type"],
            "string"
        );
    }

    #[test]
    fn test_etymology_schema_optional_quote() {
        let schema = EtymologyPayload::input_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "origin_image"));
        assert!(!required.iter().any(|v| v == "quote"));
        assert_eq!(PassagePayload::tool_name(), "passage_payload");
    }

    #[test]
    fn test_reading_payload_conversion() {
        let payload: ReadingPayload = serde_json::from_value(json!({
            "synthesis_title": "Light After Dusk",
            "synthesis_content": "Something ends so something else can begin.",
            "cards": [
                {"title": "A Quiet Past", "content": "..."},
                {"title": "A Bright Present", "content": "..."},
                {"title": "An Open Future", "content": "..."}
            ],
            "vibe": "Gentle momentum."
        }))
        .unwrap();

        let reading = TarotReading::try_from(payload).unwrap();
        assert_eq!(reading.cards[2].title, "An Open Future");
    }

    #[test]
    fn test_reading_payload_with_two_cards_is_malformed() {
        let payload: ReadingPayload = serde_json::from_value(json!({
            "synthesis_title": "t",
            "synthesis_content": "c",
            "cards": [{"title": "a", "content": "b"}, {"title": "c", "content": "d"}],
            "vibe": "v"
        }))
        .unwrap();

        assert!(matches!(
            TarotReading::try_from(payload),
            Err(OracleError::Malformed(_))
        ));
    }

    #[test]
    fn test_reading_request_names_positions() {
        let prompt = reading_request(
            &[ArcanaId::Moon, ArcanaId::Star, ArcanaId::Chariot],
            OracleTopic::Decision,
        );
        assert!(prompt.contains("Past: The Moon"));
        assert!(prompt.contains("Future: The Chariot"));
        assert!(prompt.contains("Decision"));
    }

    #[test]
    fn test_chat_request_includes_history() {
        let history = vec![ChatTurn::seeker("hi"), ChatTurn::oracle("hello")];
        let prompt = chat_request(&history, "what is lucid?");
        assert!(prompt.contains("seeker: hi\noracle: hello\n"));
        assert!(prompt.ends_with("seeker: what is lucid?"));
        assert_eq!(chat_request(&[], "hey"), "seeker: hey");
    }
}
