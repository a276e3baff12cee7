//! Crystallized readings: the share card built at the end of the ritual.
//!
//! Cards are plain data. Rendering them as an image is left to the frontend;
//! here they can be printed as text or written out as JSON.

use crate::catalog::ArcanaId;
use crate::deck::Reading;
use crate::oracle::{OracleTopic, TarotReading};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// Errors from share card export.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported share card version {0}")]
    VersionMismatch(u32),
}

const SHARE_VERSION: u32 = 1;

/// One card face on the share card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    pub arcana: ArcanaId,
    pub name: String,
    pub numeral: String,
    pub color: String,
    pub title: String,
}

/// A reading ready to be shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCard {
    pub version: u32,
    pub id: Uuid,
    pub created: NaiveDate,
    pub topic: OracleTopic,
    pub faces: [CardFace; 3],
    pub title: String,
    pub synthesis: String,
    pub vibe: String,
}

impl ShareCard {
    /// Build a share card dated today.
    pub fn new(cards: &Reading, topic: OracleTopic, reading: &TarotReading) -> Self {
        Self::new_on(cards, topic, reading, Local::now().date_naive())
    }

    pub fn new_on(
        cards: &Reading,
        topic: OracleTopic,
        reading: &TarotReading,
        created: NaiveDate,
    ) -> Self {
        let faces = std::array::from_fn(|i| {
            let data = cards[i].data();
            CardFace {
                arcana: cards[i],
                name: data.name.to_string(),
                numeral: data.numeral.to_string(),
                color: data.color.to_string(),
                title: reading.cards[i].title.clone(),
            }
        });

        Self {
            version: SHARE_VERSION,
            id: Uuid::new_v4(),
            created,
            topic,
            faces,
            title: reading.synthesis_title.clone(),
            synthesis: reading.synthesis_content.clone(),
            vibe: reading.vibe.clone(),
        }
    }

    /// Plain-text rendering for terminals and clipboards.
    pub fn to_text(&self) -> String {
        let mut text = format!("~ {} ~\n{} | {}\n\n", self.title, self.topic, self.created);
        for face in &self.faces {
            text.push_str(&format!("[{}] {}: {}\n", face.numeral, face.name, face.title));
        }
        text.push('\n');
        text.push_str(&self.synthesis);
        text.push_str("\n\n");
        text.push_str(&self.vibe);
        text
    }

    /// Save to a JSON file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ShareError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ShareError> {
        let content = fs::read_to_string(path).await?;
        let card: Self = serde_json::from_str(&content)?;
        if card.version != SHARE_VERSION {
            return Err(ShareError::VersionMismatch(card.version));
        }
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_follow_reading_order() {
        let cards = [ArcanaId::Star, ArcanaId::Moon, ArcanaId::Fool];
        let reading = TarotReading::fallback(OracleTopic::Energy);
        let card = ShareCard::new_on(&cards, OracleTopic::Energy, &reading, NaiveDate::MIN);

        assert_eq!(card.faces[0].arcana, ArcanaId::Star);
        assert_eq!(card.faces[2].name, ArcanaId::Fool.data().name);
        assert_eq!(card.faces[1].title, reading.cards[1].title);
        assert_eq!(card.title, reading.synthesis_title);
    }

    #[test]
    fn test_text_lists_every_face() {
        let cards = [ArcanaId::Lovers, ArcanaId::Empress, ArcanaId::Chariot];
        let card = ShareCard::new(&cards, OracleTopic::Love, &TarotReading::fallback(OracleTopic::Love));
        let text = card.to_text();

        for arcana in cards {
            assert!(text.contains(arcana.data().name));
        }
        assert!(text.starts_with("~ The Mists Are Thick ~"));
    }
}
