//! Testing utilities for grimoire sessions.
//!
//! This module provides tools for integration testing:
//! - `MockOracle` for deterministic testing without API calls
//! - `TestHarness` for scripted sessions on a fake clock
//! - Assertion helpers for verifying session state

use crate::catalog::GrimoireId;
use crate::config::SessionConfig;
use crate::deck::Reading;
use crate::draw::DrawOutcome;
use crate::flow::{FlowController, FlowError, FlowEvent, FlowState};
use crate::oracle::{
    CardPassage, ChatTurn, Oracle, OracleError, OracleTopic, TarotReading, WordEnrichment,
};
use crate::review::{Decision, ReviewStep};
use crate::ritual::RitualStage;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// A request the mock oracle received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Enrich(String),
    Chat { history: usize, message: String },
    Reading { cards: Reading, topic: OracleTopic },
}

/// An oracle that returns scripted answers.
///
/// Queued answers are handed out in order. With the queues empty it
/// answers readings with [`MockOracle::sample_reading`] and chats with a
/// stock line. While failing, every call returns an error.
#[derive(Default)]
pub struct MockOracle {
    readings: Mutex<VecDeque<TarotReading>>,
    replies: Mutex<VecDeque<String>>,
    etymologies: Mutex<HashMap<String, WordEnrichment>>,
    failing: Mutex<bool>,
    calls: Mutex<Vec<MockCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle whose every call fails.
    pub fn failing() -> Self {
        let oracle = Self::new();
        oracle.set_failing(true);
        oracle
    }

    pub fn set_failing(&self, failing: bool) {
        *lock(&self.failing) = failing;
    }

    pub fn queue_reading(&self, reading: TarotReading) -> &Self {
        lock(&self.readings).push_back(reading);
        self
    }

    pub fn queue_reply(&self, reply: impl Into<String>) -> &Self {
        lock(&self.replies).push_back(reply.into());
        self
    }

    /// Script the etymology returned for `word`.
    pub fn teach(&self, word: impl Into<String>, enrichment: WordEnrichment) -> &Self {
        lock(&self.etymologies).insert(word.into(), enrichment);
        self
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// A simple reading naming each card's position.
    pub fn sample_reading(topic: OracleTopic) -> TarotReading {
        let passage = |position: &str| CardPassage {
            title: format!("The {position}"),
            content: format!("What the {} card says about {topic}.", position.to_lowercase()),
        };
        TarotReading {
            synthesis_title: format!("A Reading on {topic}"),
            synthesis_content: "The cards agree more than they disagree.".to_string(),
            cards: [passage("Past"), passage("Present"), passage("Future")],
            vibe: "Steady.".to_string(),
        }
    }

    /// A placeholder etymology for `word`.
    pub fn sample_enrichment(word: &str) -> WordEnrichment {
        WordEnrichment {
            components: Vec::new(),
            origin_image: format!("An old picture behind {word}."),
            logic_chain: "picture -> meaning".to_string(),
            modern_meaning: format!("What {word} means today."),
            nuance: "Used formally.".to_string(),
            quote: None,
        }
    }

    fn record(&self, call: MockCall) -> Result<(), OracleError> {
        lock(&self.calls).push(call);
        if *lock(&self.failing) {
            return Err(OracleError::Malformed("scripted failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn enrich_word(&self, word: &str) -> Result<WordEnrichment, OracleError> {
        self.record(MockCall::Enrich(word.to_string()))?;
        Ok(lock(&self.etymologies)
            .get(word)
            .cloned()
            .unwrap_or_else(|| Self::sample_enrichment(word)))
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, OracleError> {
        self.record(MockCall::Chat {
            history: history.len(),
            message: message.to_string(),
        })?;
        Ok(lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| "The sage nods slowly.".to_string()))
    }

    async fn read_tarot(
        &self,
        cards: &Reading,
        topic: OracleTopic,
    ) -> Result<TarotReading, OracleError> {
        self.record(MockCall::Reading {
            cards: *cards,
            topic,
        })?;
        Ok(lock(&self.readings)
            .pop_front()
            .unwrap_or_else(|| Self::sample_reading(topic)))
    }
}

/// Test harness for running sessions on a fake clock.
pub struct TestHarness {
    /// The controller under test.
    pub flow: FlowController,
    /// The mock oracle.
    pub oracle: MockOracle,
    /// The current fake time.
    pub now_ms: u64,
}

impl TestHarness {
    /// Create a harness with a fixed seed.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::new().with_seed(7))
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            flow: FlowController::new(config),
            oracle: MockOracle::new(),
            now_ms: 0,
        }
    }

    /// Move the clock forward and fire whatever came due.
    pub fn advance(&mut self, ms: u64) -> Vec<FlowEvent> {
        self.now_ms += ms;
        self.flow.tick(self.now_ms)
    }

    /// Choose a grimoire and draw three cards from wherever the cursor lands.
    pub fn draw_three(&mut self) -> Result<Reading, FlowError> {
        if self.flow.state() == FlowState::Library {
            self.flow.select_book(GrimoireId::HearthstonePrimer)?;
        }
        if self.flow.state() == FlowState::OracleStart {
            self.flow.start()?;
        }

        loop {
            if let DrawOutcome::Complete(reading) = self.flow.draw()? {
                return Ok(reading);
            }
        }
    }

    /// Review until every card is found and the oracle is ready.
    ///
    /// Returns how many words were reviewed.
    pub fn study_until_ready(&mut self) -> Result<usize, FlowError> {
        if self.flow.state() == FlowState::ProphecyReveal {
            self.flow.accept_prophecy()?;
        }

        let mut reviewed = 0;
        loop {
            let outcome = self.flow.review(Decision::Remember, self.now_ms)?;
            reviewed += 1;
            self.now_ms += 1;
            if outcome.step == ReviewStep::Completed {
                break;
            }
        }

        let delay = self.flow.config().review_complete_delay_ms;
        self.advance(delay);
        Ok(reviewed)
    }

    /// Enter the oracle (if needed), pick `topic`, and consult the mock.
    pub async fn consult(&mut self, topic: OracleTopic) -> Result<(), FlowError> {
        if self.flow.state() == FlowState::OracleReady {
            self.flow.enter_oracle()?;
        }
        self.flow.choose_topic(topic)?;
        self.flow.consult(&self.oracle, self.now_ms).await
    }

    /// Let the reveal flash run out.
    pub fn reveal(&mut self) -> Vec<FlowEvent> {
        let delay = self.flow.config().revelation_delay_ms;
        self.advance(delay)
    }

    pub fn unlocked_count(&self) -> usize {
        self.flow
            .review_loop()
            .map(|r| r.unlocked().len())
            .unwrap_or(0)
    }

    pub fn ritual_stage(&self) -> RitualStage {
        self.flow.ritual().stage()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the flow is on the given screen.
#[track_caller]
pub fn assert_state(harness: &TestHarness, expected: FlowState) {
    let actual = harness.flow.state();
    assert_eq!(actual, expected, "Expected flow state {expected:?}, got {actual:?}");
}

/// Assert the ritual is at the given stage.
#[track_caller]
pub fn assert_stage(harness: &TestHarness, expected: RitualStage) {
    let actual = harness.ritual_stage();
    assert_eq!(actual, expected, "Expected ritual stage {expected:?}, got {actual:?}");
}

/// Assert how many reading slots have been unlocked.
#[track_caller]
pub fn assert_unlocked(harness: &TestHarness, expected: usize) {
    let actual = harness.unlocked_count();
    assert_eq!(actual, expected, "Expected {expected} unlocked cards, got {actual}");
}

/// Assert no timers are waiting to fire.
#[track_caller]
pub fn assert_no_timers(harness: &TestHarness) {
    assert_eq!(
        harness.flow.next_deadline(),
        None,
        "Expected no pending timers"
    );
}
