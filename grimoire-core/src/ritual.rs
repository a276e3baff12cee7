//! The oracle ritual: pick a topic, wait out the incantation, reveal the reading.
//!
//! The ritual never calls the oracle itself. [`OracleRitual::confirm`] hands
//! back a [`ReadingRequest`] for the caller to send, and the answer comes back
//! through [`OracleRitual::resolve`]. Only one request can be in flight.

use crate::config::SessionConfig;
use crate::deck::Reading;
use crate::oracle::{OracleTopic, TarotReading};
use crate::share::ShareCard;
use crate::timer::{TimerId, Timers};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Lines cycled while the oracle is thinking.
pub const INCANTATION_PHRASES: [&str; 4] = [
    "Shuffling the threads of fate...",
    "The candles lean toward your question...",
    "Three voices gather in the smoke...",
    "The veil grows thin...",
];

/// Errors from ritual operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RitualError {
    #[error("Cannot {action} during {stage}")]
    WrongStage {
        action: &'static str,
        stage: RitualStage,
    },

    #[error("Choose a topic before asking the oracle")]
    NoTopic,

    #[error("No reading has been requested")]
    NotAwaiting,

    #[error("The ritual has no cards")]
    NoCards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RitualStage {
    #[default]
    Selection,
    Incantation,
    Revelation,
}

impl fmt::Display for RitualStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RitualStage::Selection => f.write_str("topic selection"),
            RitualStage::Incantation => f.write_str("the incantation"),
            RitualStage::Revelation => f.write_str("the revelation"),
        }
    }
}

/// What to send to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingRequest {
    pub cards: Reading,
    pub topic: OracleTopic,
}

/// Something the ritual's timers did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RitualEvent {
    /// The incantation moved on to the phrase at this index.
    PhraseChanged(usize),
    /// The flash faded and the reading is on display.
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RitualTimer {
    Phrase,
    Reveal,
}

/// The ritual state machine.
#[derive(Debug, Clone)]
pub struct OracleRitual {
    stage: RitualStage,
    cards: Option<Reading>,
    topic: Option<OracleTopic>,
    result: Option<TarotReading>,
    awaiting: bool,
    flash: bool,
    share_visible: bool,
    phrase: usize,
    timers: Timers<RitualTimer>,
    phrase_timer: Option<TimerId>,
    phrase_interval_ms: u64,
    revelation_delay_ms: u64,
}

impl OracleRitual {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            stage: RitualStage::Selection,
            cards: None,
            topic: None,
            result: None,
            awaiting: false,
            flash: false,
            share_visible: false,
            phrase: 0,
            timers: Timers::new(),
            phrase_timer: None,
            phrase_interval_ms: config.incantation_phrase_interval_ms,
            revelation_delay_ms: config.revelation_delay_ms,
        }
    }

    /// Start over with a new set of cards.
    pub fn begin(&mut self, cards: Reading) {
        self.reset();
        self.cards = Some(cards);
    }

    /// Back to selection with nothing chosen. Cancels every timer.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.phrase_timer = None;
        self.stage = RitualStage::Selection;
        self.cards = None;
        self.topic = None;
        self.result = None;
        self.awaiting = false;
        self.flash = false;
        self.share_visible = false;
        self.phrase = 0;
    }

    pub fn stage(&self) -> RitualStage {
        self.stage
    }

    pub fn cards(&self) -> Option<&Reading> {
        self.cards.as_ref()
    }

    pub fn topic(&self) -> Option<OracleTopic> {
        self.topic
    }

    pub fn result(&self) -> Option<&TarotReading> {
        self.result.as_ref()
    }

    /// Whether a request is out and unanswered.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// The reveal flash, raised between a good answer and the revelation.
    pub fn is_flashing(&self) -> bool {
        self.flash
    }

    pub fn share_visible(&self) -> bool {
        self.share_visible
    }

    /// The incantation line currently on screen.
    pub fn phrase(&self) -> &'static str {
        INCANTATION_PHRASES[self.phrase % INCANTATION_PHRASES.len()]
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Pick or replace the topic.
    pub fn choose_topic(&mut self, topic: OracleTopic) -> Result<(), RitualError> {
        self.require_stage(RitualStage::Selection, "choose a topic")?;
        self.topic = Some(topic);
        debug!(%topic, "topic chosen");
        Ok(())
    }

    /// Begin the incantation and hand back the request to send.
    pub fn confirm(&mut self, now_ms: u64) -> Result<ReadingRequest, RitualError> {
        self.require_stage(RitualStage::Selection, "ask the oracle")?;
        let topic = self.topic.ok_or(RitualError::NoTopic)?;
        let cards = self.cards.ok_or(RitualError::NoCards)?;

        self.stage = RitualStage::Incantation;
        self.awaiting = true;
        self.result = None;
        self.phrase = 0;
        self.phrase_timer = Some(self.timers.every(
            RitualTimer::Phrase,
            now_ms,
            self.phrase_interval_ms,
        ));

        info!(%topic, "incantation begun");
        Ok(ReadingRequest { cards, topic })
    }

    /// Deliver the oracle's answer. `None` means the request failed.
    pub fn resolve(
        &mut self,
        reading: Option<TarotReading>,
        now_ms: u64,
    ) -> Result<(), RitualError> {
        self.require_stage(RitualStage::Incantation, "deliver a reading")?;
        if !self.awaiting {
            return Err(RitualError::NotAwaiting);
        }

        if let Some(id) = self.phrase_timer.take() {
            self.timers.cancel(id);
        }
        self.awaiting = false;

        match reading {
            Some(reading) => {
                self.result = Some(reading);
                self.flash = true;
                self.timers
                    .once(RitualTimer::Reveal, now_ms.saturating_add(self.revelation_delay_ms));
                info!("reading received; revealing");
            }
            None => {
                self.stage = RitualStage::Selection;
                self.result = None;
                warn!("reading failed; back to topic selection");
            }
        }
        Ok(())
    }

    /// Fire due timers.
    pub fn tick(&mut self, now_ms: u64) -> Vec<RitualEvent> {
        let mut events = Vec::new();
        for fired in self.timers.due(now_ms) {
            match fired.event {
                RitualTimer::Phrase => {
                    let len = INCANTATION_PHRASES.len();
                    // Only the phase matters after a long stall.
                    let steps = (fired.periods % len as u64) as usize;
                    self.phrase = (self.phrase + steps) % len;
                    events.push(RitualEvent::PhraseChanged(self.phrase));
                }
                RitualTimer::Reveal => {
                    self.flash = false;
                    self.stage = RitualStage::Revelation;
                    info!("reading revealed");
                    events.push(RitualEvent::Revealed);
                }
            }
        }
        events
    }

    /// Turn the revealed reading into a share card.
    pub fn crystallize(&mut self) -> Result<ShareCard, RitualError> {
        self.require_stage(RitualStage::Revelation, "crystallize")?;
        let (Some(cards), Some(topic), Some(reading)) =
            (self.cards.as_ref(), self.topic, self.result.as_ref())
        else {
            return Err(RitualError::NotAwaiting);
        };

        let card = ShareCard::new(cards, topic, reading);
        self.share_visible = true;
        Ok(card)
    }

    pub fn dismiss_share(&mut self) {
        self.share_visible = false;
    }

    fn require_stage(&self, stage: RitualStage, action: &'static str) -> Result<(), RitualError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(RitualError::WrongStage {
                action,
                stage: self.stage,
            })
        }
    }
}
