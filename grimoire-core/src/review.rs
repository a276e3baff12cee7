//! The flashcard review loop.
//!
//! Reviewing walks the session deck one word at a time. Words carrying a
//! hidden arcana unlock that slot of the reading. Reaching the end of the
//! deck before all three slots are unlocked wraps back to the first word,
//! so a session keeps cycling until every hidden card has been found.

use crate::deck::{Reading, SessionCard};
use crate::draw::CARDS_PER_READING;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the review loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("The study deck is empty")]
    EmptyDeck,

    #[error("Every card has been found; the review is over")]
    Finished,
}

/// The seeker's verdict on the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Remember,
    Forget,
}

/// Where the cursor went after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStep {
    /// Moved to the next word.
    Advanced,
    /// Hit the end with cards still hidden; back to the first word.
    Wrapped,
    /// Hit the end with every card found.
    Completed,
}

/// Result of one review decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Reading slot unlocked by this word, if it was newly found.
    pub unlocked: Option<usize>,
    pub step: ReviewStep,
    /// Progress through the current pass, 0 to 100.
    pub progress: u8,
}

/// Counts shown on the profile screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTally {
    pub remembered: u32,
    pub forgotten: u32,
    /// Times the loop wrapped back to the first word.
    pub passes: u32,
}

/// The review loop over one session deck.
#[derive(Debug, Clone)]
pub struct ReviewLoop {
    deck: Vec<SessionCard>,
    reading: Reading,
    current: usize,
    unlocked: BTreeSet<usize>,
    finished: bool,
    tally: ReviewTally,
}

impl ReviewLoop {
    pub fn new(deck: Vec<SessionCard>, reading: Reading) -> Result<Self, ReviewError> {
        if deck.is_empty() {
            return Err(ReviewError::EmptyDeck);
        }
        Ok(Self {
            deck,
            reading,
            current: 0,
            unlocked: BTreeSet::new(),
            finished: false,
            tally: ReviewTally::default(),
        })
    }

    pub fn deck(&self) -> &[SessionCard] {
        &self.deck
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &SessionCard {
        &self.deck[self.current]
    }

    /// Reading slots found so far.
    pub fn unlocked(&self) -> &BTreeSet<usize> {
        &self.unlocked
    }

    pub fn all_unlocked(&self) -> bool {
        self.unlocked.len() == CARDS_PER_READING
    }

    /// Whether the loop has completed and accepts no more reviews.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tally(&self) -> ReviewTally {
        self.tally
    }

    /// Progress through the current pass, rounded to a whole percent.
    pub fn progress(&self) -> u8 {
        let len = self.deck.len() as f64;
        ((100.0 * (self.current + 1) as f64 / len).round()) as u8
    }

    /// Record a decision on the current word and move on.
    ///
    /// Both decisions move the cursor the same way; they only differ in
    /// the tally.
    pub fn review(&mut self, decision: Decision) -> Result<ReviewOutcome, ReviewError> {
        if self.finished {
            return Err(ReviewError::Finished);
        }

        match decision {
            Decision::Remember => self.tally.remembered += 1,
            Decision::Forget => self.tally.forgotten += 1,
        }

        let unlocked = self.unlock_current();

        let step = if self.current + 1 < self.deck.len() {
            self.current += 1;
            ReviewStep::Advanced
        } else if self.all_unlocked() {
            self.finished = true;
            info!(passes = self.tally.passes + 1, "all hidden cards found");
            ReviewStep::Completed
        } else {
            self.current = 0;
            self.tally.passes += 1;
            debug!(found = self.unlocked.len(), "review wrapped to first word");
            ReviewStep::Wrapped
        };

        Ok(ReviewOutcome {
            unlocked,
            step,
            progress: self.progress(),
        })
    }

    fn unlock_current(&mut self) -> Option<usize> {
        let hidden = self.deck[self.current].hidden?;
        if hidden.position >= CARDS_PER_READING || self.reading[hidden.position] != hidden.arcana {
            return None;
        }
        if self.unlocked.insert(hidden.position) {
            debug!(position = hidden.position, arcana = %hidden.arcana, "card unlocked");
            Some(hidden.position)
        } else {
            None
        }
    }
}
