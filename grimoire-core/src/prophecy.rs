//! Daily prophecies and the in-memory prophecy log.

use crate::catalog::ArcanaId;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest prophecy excerpt kept in the history log.
pub const EXCERPT_CHARS: usize = 48;

/// The prophecy revealed after a draw. Display only; never logged in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProphecy {
    pub arcana: ArcanaId,
    pub lucky_word: String,
    pub text: String,
    pub mantra: String,
}

impl DailyProphecy {
    /// Fill the lead card's template with the lucky word.
    pub fn compose(arcana: ArcanaId, lucky_word: &str) -> Self {
        let data = arcana.data();
        Self {
            arcana,
            lucky_word: lucky_word.to_string(),
            text: data.prophecy.replace("{word}", lucky_word),
            mantra: format!("Today I walk with {}.", data.keyword),
        }
    }
}

/// One entry in the prophecy log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProphecyRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub arcana: ArcanaId,
    /// The prophecy, cut to [`EXCERPT_CHARS`] characters.
    pub excerpt: String,
    /// Words placed in the study deck for this reading.
    pub words_sealed: usize,
}

impl ProphecyRecord {
    pub fn new(prophecy: &DailyProphecy, words_sealed: usize, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            arcana: prophecy.arcana,
            excerpt: excerpt(&prophecy.text),
            words_sealed,
        }
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(EXCERPT_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Prophecy log for the running session, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProphecyHistory {
    records: Vec<ProphecyRecord>,
}

impl ProphecyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a prophecy dated today.
    pub fn record(&mut self, prophecy: &DailyProphecy, words_sealed: usize) -> &ProphecyRecord {
        self.record_on(prophecy, words_sealed, Local::now().date_naive())
    }

    /// Log a prophecy with an explicit date.
    pub fn record_on(
        &mut self,
        prophecy: &DailyProphecy,
        words_sealed: usize,
        date: NaiveDate,
    ) -> &ProphecyRecord {
        self.records
            .insert(0, ProphecyRecord::new(prophecy, words_sealed, date));
        &self.records[0]
    }

    pub fn records(&self) -> &[ProphecyRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&ProphecyRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Words sealed across every logged reading.
    pub fn total_words_sealed(&self) -> usize {
        self.records.iter().map(|r| r.words_sealed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_fills_template() {
        let prophecy = DailyProphecy::compose(ArcanaId::Moon, "eclipse");
        assert!(prophecy.text.contains("\"eclipse\""));
        assert!(!prophecy.text.contains("{word}"));
        assert!(prophecy.mantra.contains("mystery"));
    }

    #[test]
    fn test_history_is_newest_first() {
        let mut history = ProphecyHistory::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        history.record_on(&DailyProphecy::compose(ArcanaId::Star, "lucid"), 10, date);
        history.record_on(&DailyProphecy::compose(ArcanaId::Fool, "progress"), 30, date);

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().arcana, ArcanaId::Fool);
        assert_eq!(history.records()[1].arcana, ArcanaId::Star);
        assert_eq!(history.total_words_sealed(), 40);
    }

    #[test]
    fn test_excerpt_is_truncated() {
        let prophecy = DailyProphecy::compose(ArcanaId::HighPriestess, "somnambulist");
        let record = ProphecyRecord::new(&prophecy, 6, NaiveDate::MIN);

        assert!(prophecy.text.chars().count() > EXCERPT_CHARS);
        assert_eq!(record.excerpt.chars().count(), EXCERPT_CHARS + 3);
        assert!(record.excerpt.ends_with("..."));
    }

    #[test]
    fn test_short_text_is_kept_whole() {
        assert_eq!(excerpt("Brief."), "Brief.");
    }
}
