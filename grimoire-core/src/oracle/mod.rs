//! The AI oracle: word enrichment, chat, and tarot readings.
//!
//! [`Oracle`] is the seam between the session and whatever generates text.
//! [`ClaudeOracle`] talks to the Claude API; `testing::MockOracle` returns
//! scripted answers for tests.

mod anthropic;
mod conversation;
mod prompts;

pub use anthropic::{ClaudeOracle, OracleConfig};
pub use conversation::{ChatTurn, Conversation, Speaker, FALLBACK_REPLY};

use crate::catalog::Morpheme;
use crate::deck::Reading;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from the oracle collaborator.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("No oracle credential configured - set ANTHROPIC_API_KEY")]
    NoCredential,

    #[error("Claude API error: {0}")]
    Api(#[from] claude::Error),

    #[error("Malformed oracle answer: {0}")]
    Malformed(String),
}

/// What the seeker asks the ritual about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleTopic {
    Love,
    Wealth,
    Decision,
    Energy,
}

impl OracleTopic {
    pub const ALL: [OracleTopic; 4] = [
        OracleTopic::Love,
        OracleTopic::Wealth,
        OracleTopic::Decision,
        OracleTopic::Energy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OracleTopic::Love => "Love",
            OracleTopic::Wealth => "Wealth",
            OracleTopic::Decision => "Decision",
            OracleTopic::Energy => "Energy",
        }
    }

    /// The question the oracle is asked to answer.
    pub fn focus(self) -> &'static str {
        match self {
            OracleTopic::Love => "relationships, affection and the people close to the seeker",
            OracleTopic::Wealth => "money, career and material opportunity",
            OracleTopic::Decision => "a choice the seeker is weighing and which path to take",
            OracleTopic::Energy => "health, mood and where the seeker should spend their strength",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|topic| topic.label().to_lowercase() == s)
    }
}

impl fmt::Display for OracleTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One card's passage in a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPassage {
    pub title: String,
    pub content: String,
}

/// A three-card reading written by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TarotReading {
    pub synthesis_title: String,
    pub synthesis_content: String,
    /// Past, present and future, in reading order.
    pub cards: [CardPassage; 3],
    /// A short line capturing the mood.
    pub vibe: String,
}

impl TarotReading {
    /// Placeholder reading used when the oracle cannot be reached.
    pub fn fallback(topic: OracleTopic) -> Self {
        let passage = |title: &str| CardPassage {
            title: title.to_string(),
            content: "The vision is clouded and this card's voice did not reach us.".to_string(),
        };
        Self {
            synthesis_title: "The Mists Are Thick".to_string(),
            synthesis_content: format!(
                "Forgive us, seeker. The oracle could not speak clearly about {} right now. \
                 The cards you drew still hold their meaning; return to them when the mists lift.",
                topic.label().to_lowercase()
            ),
            cards: [passage("Past, Veiled"), passage("Present, Veiled"), passage("Future, Veiled")],
            vibe: "Patience is also an answer.".to_string(),
        }
    }
}

/// Etymology breakdown of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEnrichment {
    pub components: Vec<Morpheme>,
    pub origin_image: String,
    pub logic_chain: String,
    pub modern_meaning: String,
    pub nuance: String,
    pub quote: Option<String>,
}

/// A text-generation collaborator.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Break a word down into its roots.
    async fn enrich_word(&self, word: &str) -> Result<WordEnrichment, OracleError>;

    /// Answer the seeker, given the conversation so far.
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, OracleError>;

    /// Write a reading for three cards and a topic.
    async fn read_tarot(
        &self,
        cards: &Reading,
        topic: OracleTopic,
    ) -> Result<TarotReading, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_parse() {
        assert_eq!(OracleTopic::parse("love"), Some(OracleTopic::Love));
        assert_eq!(OracleTopic::parse(" Energy "), Some(OracleTopic::Energy));
        assert_eq!(OracleTopic::parse("fame"), None);
    }

    #[test]
    fn test_fallback_mentions_topic() {
        let reading = TarotReading::fallback(OracleTopic::Wealth);
        assert!(reading.synthesis_content.contains("wealth"));
        assert_eq!(reading.cards.len(), 3);
    }
}
