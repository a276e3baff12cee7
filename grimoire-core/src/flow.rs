//! The session flow controller.
//!
//! [`FlowController`] owns every piece of session state and performs each
//! screen transition: library, altar, prophecy, study, and the oracle
//! ritual. Operations issued from the wrong screen fail with
//! [`FlowError::InvalidTransition`] and change nothing.
//!
//! The controller is driven by a logical clock. Anything that schedules a
//! delayed transition takes `now_ms`, and [`FlowController::tick`] fires
//! whatever has come due.

use crate::catalog::{vocabulary, ArcanaId, GrimoireId};
use crate::config::SessionConfig;
use crate::deck::{build_session_deck, lucky_word, Reading};
use crate::draw::{DrawError, DrawOutcome, DrawTable};
use crate::oracle::{
    ChatTurn, Conversation, Oracle, OracleTopic, TarotReading, WordEnrichment, FALLBACK_REPLY,
};
use crate::prophecy::{DailyProphecy, ProphecyHistory};
use crate::review::{Decision, ReviewError, ReviewLoop, ReviewOutcome, ReviewStep, ReviewTally};
use crate::ritual::{OracleRitual, ReadingRequest, RitualError, RitualEvent};
use crate::share::ShareCard;
use crate::timer::{TimerId, Timers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from flow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Cannot {action} from {state}")]
    InvalidTransition {
        action: &'static str,
        state: FlowState,
    },

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Ritual(#[from] RitualError),
}

/// The screen the oracle tab is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    Library,
    OracleStart,
    Altar,
    ProphecyReveal,
    Learning,
    OracleReady,
    OracleReading,
}

impl FlowState {
    /// Screens that hide the bottom navigation.
    pub fn is_immersive(self) -> bool {
        matches!(
            self,
            FlowState::Altar
                | FlowState::ProphecyReveal
                | FlowState::Learning
                | FlowState::OracleReady
                | FlowState::OracleReading
        )
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::Library => "the library",
            FlowState::OracleStart => "the oracle's door",
            FlowState::Altar => "the altar",
            FlowState::ProphecyReveal => "the prophecy",
            FlowState::Learning => "study",
            FlowState::OracleReady => "the waiting oracle",
            FlowState::OracleReading => "the reading",
        };
        f.write_str(name)
    }
}

/// Top-level navigation tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Oracle,
    Grimoire,
    Profile,
}

impl Tab {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "oracle" => Some(Tab::Oracle),
            "grimoire" => Some(Tab::Grimoire),
            "profile" => Some(Tab::Profile),
            _ => None,
        }
    }
}

/// What is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Flow(FlowState),
    Grimoire,
    Profile,
}

/// Something a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    /// Study finished; the oracle is ready.
    ReviewComplete,
    Ritual(RitualEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowTimer {
    ReviewComplete,
}

/// Totals shown on the profile screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileSummary {
    pub readings: usize,
    pub words_sealed: usize,
    pub tally: ReviewTally,
}

/// The session controller.
pub struct FlowController {
    config: SessionConfig,
    rng: StdRng,
    state: FlowState,
    tab: Tab,
    book: Option<GrimoireId>,
    table: Option<DrawTable>,
    reading: Option<Reading>,
    prophecy: Option<DailyProphecy>,
    review: Option<ReviewLoop>,
    ritual: OracleRitual,
    share: Option<ShareCard>,
    history: ProphecyHistory,
    lifetime: ReviewTally,
    timers: Timers<FlowTimer>,
    review_timer: Option<TimerId>,
    enrichments: HashMap<String, WordEnrichment>,
    conversation: Conversation,
}

impl FlowController {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ritual = OracleRitual::new(&config);

        Self {
            config,
            rng,
            state: FlowState::Library,
            tab: Tab::Oracle,
            book: None,
            table: None,
            reading: None,
            prophecy: None,
            review: None,
            ritual,
            share: None,
            history: ProphecyHistory::new(),
            lifetime: ReviewTally::default(),
            timers: Timers::new(),
            review_timer: None,
            enrichments: HashMap::new(),
            conversation: Conversation::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn book(&self) -> Option<GrimoireId> {
        self.book
    }

    pub fn table(&self) -> Option<&DrawTable> {
        self.table.as_ref()
    }

    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    pub fn prophecy(&self) -> Option<&DailyProphecy> {
        self.prophecy.as_ref()
    }

    pub fn review_loop(&self) -> Option<&ReviewLoop> {
        self.review.as_ref()
    }

    pub fn ritual(&self) -> &OracleRitual {
        &self.ritual
    }

    /// The last crystallized reading.
    pub fn share_card(&self) -> Option<&ShareCard> {
        self.share.as_ref()
    }

    pub fn history(&self) -> &ProphecyHistory {
        &self.history
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// A cached etymology for `word`, if one was fetched this session.
    pub fn enrichment(&self, word: &str) -> Option<&WordEnrichment> {
        self.enrichments.get(word)
    }

    pub fn profile(&self) -> ProfileSummary {
        ProfileSummary {
            readings: self.history.len(),
            words_sealed: self.history.total_words_sealed(),
            tally: self.lifetime,
        }
    }

    /// Exactly one view is on screen at a time.
    pub fn view(&self) -> View {
        match self.tab {
            Tab::Oracle => View::Flow(self.state),
            Tab::Grimoire => View::Grimoire,
            Tab::Profile => View::Profile,
        }
    }

    /// Whether the bottom navigation is shown.
    pub fn nav_visible(&self) -> bool {
        !self.state.is_immersive()
    }

    /// Earliest pending deadline across the session's timers.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.timers.next_deadline(), self.ritual.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Switch tabs. Opening the oracle tab from the library with a book
    /// chosen steps through to the oracle's door.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if tab == Tab::Oracle && self.book.is_some() && self.state == FlowState::Library {
            self.transition(FlowState::OracleStart);
        }
    }

    /// Choose the book to study. From the oracle tab this opens the oracle's
    /// door; from the grimoire tab the book is only marked, and the door
    /// opens when the seeker switches back to the oracle tab.
    pub fn select_book(&mut self, book: GrimoireId) -> Result<(), FlowError> {
        self.require(&[FlowState::Library, FlowState::OracleStart], "choose a grimoire")?;
        self.book = Some(book);
        info!(book = %book, tab = ?self.tab, "grimoire chosen");
        if self.tab == Tab::Oracle {
            self.transition(FlowState::OracleStart);
        }
        Ok(())
    }

    /// Lay out the draw table.
    pub fn start(&mut self) -> Result<(), FlowError> {
        self.require(&[FlowState::OracleStart], "approach the altar")?;
        self.table = Some(DrawTable::shuffled(&ArcanaId::ALL, &mut self.rng));
        self.transition(FlowState::Altar);
        Ok(())
    }

    /// Abandon the current reading and return to the oracle's door.
    pub fn reset(&mut self) -> Result<(), FlowError> {
        if self.state == FlowState::Library {
            return Err(self.invalid("reset"));
        }

        self.timers.cancel_all();
        self.review_timer = None;
        self.ritual.reset();
        self.table = None;
        self.reading = None;
        self.prophecy = None;
        self.review = None;
        self.share = None;
        self.transition(FlowState::OracleStart);
        Ok(())
    }

    pub fn move_cursor(&mut self, delta: isize) -> Result<usize, FlowError> {
        let table = self.table_mut("move the cursor")?;
        Ok(table.move_cursor(delta))
    }

    pub fn focus(&mut self, slot: usize) -> Result<(), FlowError> {
        let table = self.table_mut("focus a card")?;
        table.focus(slot)?;
        Ok(())
    }

    /// Draw the focused card. The third draw reveals the prophecy.
    pub fn draw(&mut self) -> Result<DrawOutcome, FlowError> {
        let outcome = self.table_mut("draw a card")?.select()?;

        if let DrawOutcome::Complete(reading) = outcome {
            self.seal_reading(reading)?;
        }
        Ok(outcome)
    }

    fn seal_reading(&mut self, reading: Reading) -> Result<(), FlowError> {
        let deck = build_session_deck(&reading, vocabulary(), &mut self.rng);
        let lucky = lucky_word(&deck, &mut self.rng)
            .map(|w| w.word.clone())
            .unwrap_or_default();
        let prophecy = DailyProphecy::compose(reading[0], &lucky);

        let review = ReviewLoop::new(deck, reading)?;
        self.history.record(&prophecy, review.deck().len());
        info!(
            cards = ?reading,
            words = review.deck().len(),
            "reading sealed"
        );

        self.reading = Some(reading);
        self.prophecy = Some(prophecy);
        self.review = Some(review);
        self.transition(FlowState::ProphecyReveal);
        Ok(())
    }

    pub fn accept_prophecy(&mut self) -> Result<(), FlowError> {
        self.require(&[FlowState::ProphecyReveal], "accept the prophecy")?;
        self.prophecy = None;
        self.transition(FlowState::Learning);
        Ok(())
    }

    /// Judge the current word. Finding the last hidden card schedules the
    /// move to the oracle.
    pub fn review(&mut self, decision: Decision, now_ms: u64) -> Result<ReviewOutcome, FlowError> {
        self.require(&[FlowState::Learning], "review a word")?;
        let review = self
            .review
            .as_mut()
            .ok_or(FlowError::Review(ReviewError::EmptyDeck))?;
        let outcome = review.review(decision)?;

        match decision {
            Decision::Remember => self.lifetime.remembered += 1,
            Decision::Forget => self.lifetime.forgotten += 1,
        }
        match outcome.step {
            ReviewStep::Wrapped => self.lifetime.passes += 1,
            ReviewStep::Completed => {
                let due = now_ms.saturating_add(self.config.review_complete_delay_ms);
                self.review_timer = Some(self.timers.once(FlowTimer::ReviewComplete, due));
                debug!(due, "oracle scheduled");
            }
            ReviewStep::Advanced => {}
        }

        Ok(outcome)
    }

    /// Fetch (or recall) the etymology of the word under study.
    ///
    /// A failed request yields `None` and caches nothing.
    pub async fn enrich_current(
        &mut self,
        oracle: &dyn Oracle,
    ) -> Result<Option<WordEnrichment>, FlowError> {
        self.require(&[FlowState::Learning], "study a word")?;
        let Some(word) = self.review.as_ref().map(|r| r.current().word.word.clone()) else {
            return Ok(None);
        };

        if let Some(cached) = self.enrichments.get(&word) {
            return Ok(Some(cached.clone()));
        }

        match oracle.enrich_word(&word).await {
            Ok(enrichment) => {
                self.enrichments.insert(word, enrichment.clone());
                Ok(Some(enrichment))
            }
            Err(e) => {
                warn!(error = %e, word = %word, "etymology unavailable");
                Ok(None)
            }
        }
    }

    /// Ask the sage a question. Failures are answered with the fallback line.
    pub async fn ask(&mut self, oracle: &dyn Oracle, message: &str) -> Result<String, FlowError> {
        self.require(&[FlowState::Learning], "talk to the sage")?;

        let reply = match oracle.chat(self.conversation.turns(), message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "chat failed");
                FALLBACK_REPLY.to_string()
            }
        };

        self.conversation.push(ChatTurn::seeker(message));
        self.conversation.push(ChatTurn::oracle(reply.clone()));
        Ok(reply)
    }

    pub fn enter_oracle(&mut self) -> Result<(), FlowError> {
        self.require(&[FlowState::OracleReady], "enter the oracle")?;
        let reading = self
            .reading
            .ok_or(FlowError::Ritual(RitualError::NoCards))?;
        self.ritual.begin(reading);
        self.share = None;
        self.transition(FlowState::OracleReading);
        Ok(())
    }

    pub fn choose_topic(&mut self, topic: OracleTopic) -> Result<(), FlowError> {
        self.require(&[FlowState::OracleReading], "choose a topic")?;
        self.ritual.choose_topic(topic)?;
        Ok(())
    }

    /// Start the incantation. Send the returned request to the oracle and
    /// hand the answer to [`resolve_reading`](Self::resolve_reading).
    pub fn confirm_topic(&mut self, now_ms: u64) -> Result<ReadingRequest, FlowError> {
        self.require(&[FlowState::OracleReading], "consult the oracle")?;
        Ok(self.ritual.confirm(now_ms)?)
    }

    pub fn resolve_reading(
        &mut self,
        reading: Option<TarotReading>,
        now_ms: u64,
    ) -> Result<(), FlowError> {
        self.require(&[FlowState::OracleReading], "receive a reading")?;
        self.ritual.resolve(reading, now_ms)?;
        Ok(())
    }

    /// Confirm, ask `oracle`, and resolve in one step.
    ///
    /// Holds the controller for the whole request, so no ticks run while it
    /// waits. Interactive callers race the request against their own clock
    /// instead.
    pub async fn consult(&mut self, oracle: &dyn Oracle, now_ms: u64) -> Result<(), FlowError> {
        let request = self.confirm_topic(now_ms)?;
        let reading = match oracle.read_tarot(&request.cards, request.topic).await {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!(error = %e, "the oracle did not answer");
                None
            }
        };
        self.resolve_reading(reading, now_ms)
    }

    pub fn crystallize(&mut self) -> Result<&ShareCard, FlowError> {
        self.require(&[FlowState::OracleReading], "crystallize")?;
        let card = self.ritual.crystallize()?;
        info!(id = %card.id, "reading crystallized");
        Ok(self.share.insert(card))
    }

    /// Fire every timer due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Vec<FlowEvent> {
        let mut events = Vec::new();

        for fired in self.timers.due(now_ms) {
            match fired.event {
                FlowTimer::ReviewComplete => {
                    if self.review_timer == Some(fired.id) {
                        self.review_timer = None;
                    }
                    if self.state == FlowState::Learning {
                        self.transition(FlowState::OracleReady);
                        events.push(FlowEvent::ReviewComplete);
                    }
                }
            }
        }

        events.extend(self.ritual.tick(now_ms).into_iter().map(FlowEvent::Ritual));
        events
    }

    fn transition(&mut self, to: FlowState) {
        if self.state != to {
            info!(from = ?self.state, to = ?to, "flow transition");
        }
        self.state = to;
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            action,
            state: self.state,
        }
    }

    fn require(&self, allowed: &[FlowState], action: &'static str) -> Result<(), FlowError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn table_mut(&mut self, action: &'static str) -> Result<&mut DrawTable, FlowError> {
        self.require(&[FlowState::Altar], action)?;
        let state = self.state;
        self.table
            .as_mut()
            .ok_or(FlowError::InvalidTransition { action, state })
    }
}
