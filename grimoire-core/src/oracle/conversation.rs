//! Chat history with the oracle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reply shown when the oracle cannot answer.
pub const FALLBACK_REPLY: &str =
    "The crystal ball is cloudy right now. Ask me again in a little while.";

/// Who said a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Seeker,
    Oracle,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Seeker => f.write_str("seeker"),
            Speaker::Oracle => f.write_str("oracle"),
        }
    }
}

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn seeker(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Seeker,
            text: text.into(),
        }
    }

    pub fn oracle(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Oracle,
            text: text.into(),
        }
    }
}

impl fmt::Display for ChatTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// The running conversation for a session.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// History as `"speaker: text"` lines.
    pub fn transcript(&self) -> Vec<String> {
        self.turns.iter().map(ChatTurn::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_lines() {
        let mut conversation = Conversation::new();
        conversation.push(ChatTurn::seeker("What does lucid mean?"));
        conversation.push(ChatTurn::oracle("Full of light, seeker."));

        assert_eq!(
            conversation.transcript(),
            vec![
                "seeker: What does lucid mean?".to_string(),
                "oracle: Full of light, seeker.".to_string(),
            ]
        );
    }
}
