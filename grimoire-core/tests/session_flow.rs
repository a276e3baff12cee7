//! Session flow tests driven through the mock oracle.
//!
//! These exercise whole sessions from the library to a crystallized
//! reading on a fake clock, with no network access.

use grimoire_core::flow::{FlowError, FlowEvent, FlowState, Tab, View};
use grimoire_core::oracle::{OracleTopic, TarotReading, FALLBACK_REPLY};
use grimoire_core::review::Decision;
use grimoire_core::ritual::{RitualEvent, RitualStage};
use grimoire_core::share::ShareCard;
use grimoire_core::testing::{
    assert_no_timers, assert_stage, assert_state, assert_unlocked, MockCall, TestHarness,
};
use grimoire_core::{GrimoireId, SessionConfig};

// =============================================================================
// FULL SESSIONS
// =============================================================================

#[tokio::test]
async fn test_library_to_share_card() {
    let mut harness = TestHarness::new();
    harness.flow.set_tab(Tab::Oracle);
    assert_state(&harness, FlowState::Library);

    let reading = harness.draw_three().unwrap();
    assert_state(&harness, FlowState::ProphecyReveal);
    assert_eq!(harness.flow.history().len(), 1);

    harness.study_until_ready().unwrap();
    assert_state(&harness, FlowState::OracleReady);
    assert_unlocked(&harness, 3);

    harness.flow.enter_oracle().unwrap();
    assert_stage(&harness, RitualStage::Selection);
    assert!(harness.flow.ritual().topic().is_none());

    let scripted = grimoire_core::testing::MockOracle::sample_reading(OracleTopic::Energy);
    harness.oracle.queue_reading(scripted.clone());
    harness.consult(OracleTopic::Energy).await.unwrap();

    let events = harness.reveal();
    assert_eq!(events, vec![FlowEvent::Ritual(RitualEvent::Revealed)]);
    assert_stage(&harness, RitualStage::Revelation);
    assert_eq!(harness.flow.ritual().result(), Some(&scripted));

    let card = harness.flow.crystallize().unwrap().clone();
    assert!(harness.flow.ritual().share_visible());
    assert_eq!(card.faces.map(|f| f.arcana), reading);
    assert_eq!(card.topic, OracleTopic::Energy);
    assert_no_timers(&harness);
}

#[tokio::test]
async fn test_failed_reading_keeps_topic() {
    let mut harness = TestHarness::new();
    harness.draw_three().unwrap();
    harness.study_until_ready().unwrap();

    harness.oracle.set_failing(true);
    harness.consult(OracleTopic::Wealth).await.unwrap();

    assert_stage(&harness, RitualStage::Selection);
    assert_eq!(harness.flow.ritual().topic(), Some(OracleTopic::Wealth));
    assert!(harness.flow.ritual().result().is_none());
    assert_no_timers(&harness);

    // The seeker may simply try again.
    harness.oracle.set_failing(false);
    harness.flow.consult(&harness.oracle, harness.now_ms).await.unwrap();
    assert!(harness.flow.ritual().is_flashing());
    assert_eq!(harness.oracle.call_count(), 2);
}

#[tokio::test]
async fn test_incantation_phrases_tick_until_answer() {
    let mut harness = TestHarness::with_config(
        SessionConfig::new()
            .with_seed(11)
            .with_incantation_interval(500),
    );
    harness.draw_three().unwrap();
    harness.study_until_ready().unwrap();
    harness.flow.enter_oracle().unwrap();
    harness.flow.choose_topic(OracleTopic::Love).unwrap();

    let request = harness.flow.confirm_topic(harness.now_ms).unwrap();
    assert_eq!(request.topic, OracleTopic::Love);
    assert!(harness.flow.ritual().is_awaiting());

    assert_eq!(
        harness.advance(500),
        vec![FlowEvent::Ritual(RitualEvent::PhraseChanged(1))]
    );
    assert_eq!(
        harness.advance(500),
        vec![FlowEvent::Ritual(RitualEvent::PhraseChanged(2))]
    );

    // A long stall fires once, with the phrase still in step.
    assert_eq!(
        harness.advance(500 * 4_001),
        vec![FlowEvent::Ritual(RitualEvent::PhraseChanged(3))]
    );

    // A second confirm while waiting is refused.
    assert!(matches!(
        harness.flow.confirm_topic(harness.now_ms),
        Err(FlowError::Ritual(_))
    ));

    harness
        .flow
        .resolve_reading(Some(TarotReading::fallback(OracleTopic::Love)), harness.now_ms)
        .unwrap();
    // Phrase timer is gone; only the reveal remains.
    let events = harness.advance(5_000);
    assert_eq!(events, vec![FlowEvent::Ritual(RitualEvent::Revealed)]);
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[test]
fn test_oracle_tab_opens_chosen_book() {
    let mut harness = TestHarness::new();
    harness.flow.select_book(GrimoireId::WayfarersAtlas).unwrap();
    harness.flow.set_tab(Tab::Grimoire);
    assert_eq!(harness.flow.view(), View::Grimoire);
    assert!(harness.flow.nav_visible());

    harness.flow.set_tab(Tab::Oracle);
    assert_eq!(harness.flow.view(), View::Flow(FlowState::OracleStart));
}

#[test]
fn test_nav_hidden_through_the_ritual() {
    let mut harness = TestHarness::new();
    harness.draw_three().unwrap();
    assert!(!harness.flow.nav_visible());

    harness.flow.set_tab(Tab::Profile);
    assert_eq!(harness.flow.view(), View::Profile);
    assert!(!harness.flow.nav_visible());
}

#[test]
fn test_reset_cancels_pending_oracle() {
    let mut harness = TestHarness::new();
    harness.draw_three().unwrap();
    harness.flow.accept_prophecy().unwrap();

    // Finish studying but reset before the oracle wakes.
    loop {
        let outcome = harness.flow.review(Decision::Remember, harness.now_ms).unwrap();
        if outcome.step == grimoire_core::review::ReviewStep::Completed {
            break;
        }
    }
    assert!(harness.flow.next_deadline().is_some());

    harness.flow.reset().unwrap();
    assert_state(&harness, FlowState::OracleStart);
    assert_no_timers(&harness);
    assert!(harness.advance(60_000).is_empty());
    assert_state(&harness, FlowState::OracleStart);
    assert!(harness.flow.review_loop().is_none());

    // History survives a reset.
    assert_eq!(harness.flow.history().len(), 1);
}

#[test]
fn test_second_reading_is_logged_first() {
    let mut harness = TestHarness::new();
    let first = harness.draw_three().unwrap();
    harness.flow.reset().unwrap();
    let second = harness.draw_three().unwrap();

    let records = harness.flow.history().records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].arcana, second[0]);
    assert_eq!(records[1].arcana, first[0]);
    assert_eq!(
        harness.flow.profile().words_sealed,
        records[0].words_sealed + records[1].words_sealed
    );
}

// =============================================================================
// STUDY COLLABORATORS
// =============================================================================

#[tokio::test]
async fn test_enrichment_is_cached_per_word() {
    let mut harness = TestHarness::new();
    harness.draw_three().unwrap();
    harness.flow.accept_prophecy().unwrap();

    let first = harness.flow.enrich_current(&harness.oracle).await.unwrap();
    let again = harness.flow.enrich_current(&harness.oracle).await.unwrap();
    assert!(first.is_some());
    assert_eq!(first, again);
    assert_eq!(harness.oracle.call_count(), 1);

    let word = harness.flow.review_loop().unwrap().current().word.word.clone();
    assert!(harness.flow.enrichment(&word).is_some());
}

#[tokio::test]
async fn test_failed_enrichment_is_not_cached() {
    let mut harness = TestHarness::new();
    harness.draw_three().unwrap();
    harness.flow.accept_prophecy().unwrap();
    harness.oracle.set_failing(true);

    assert_eq!(harness.flow.enrich_current(&harness.oracle).await.unwrap(), None);
    let word = harness.flow.review_loop().unwrap().current().word.word.clone();
    assert!(harness.flow.enrichment(&word).is_none());

    harness.oracle.set_failing(false);
    assert!(harness.flow.enrich_current(&harness.oracle).await.unwrap().is_some());
}

#[tokio::test]
async fn test_chat_keeps_history() {
    let mut harness = TestHarness::new();
    harness.draw_three().unwrap();
    harness.flow.accept_prophecy().unwrap();

    harness.oracle.queue_reply("Lumen is Latin for light.");
    let reply = harness.flow.ask(&harness.oracle, "Where does lucid come from?").await.unwrap();
    assert_eq!(reply, "Lumen is Latin for light.");

    harness.oracle.set_failing(true);
    let reply = harness.flow.ask(&harness.oracle, "And luminous?").await.unwrap();
    assert_eq!(reply, FALLBACK_REPLY);

    assert_eq!(
        harness.oracle.calls(),
        vec![
            MockCall::Chat {
                history: 0,
                message: "Where does lucid come from?".to_string(),
            },
            MockCall::Chat {
                history: 2,
                message: "And luminous?".to_string(),
            },
        ]
    );
    assert_eq!(
        harness.flow.conversation().transcript()[1],
        "oracle: Lumen is Latin for light."
    );
}

#[tokio::test]
async fn test_chat_outside_study_is_refused() {
    let mut harness = TestHarness::new();
    let result = harness.flow.ask(&harness.oracle, "hello?").await;
    assert!(matches!(
        result,
        Err(FlowError::InvalidTransition {
            state: FlowState::Library,
            ..
        })
    ));
    assert_eq!(harness.oracle.call_count(), 0);
}

// =============================================================================
// SHARE CARDS
// =============================================================================

#[tokio::test]
async fn test_share_card_round_trips_through_disk() {
    let mut harness = TestHarness::new();
    harness.draw_three().unwrap();
    harness.study_until_ready().unwrap();
    harness.consult(OracleTopic::Decision).await.unwrap();
    harness.reveal();
    let card = harness.flow.crystallize().unwrap().clone();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reading.json");
    card.save(&path).await.unwrap();

    let loaded = ShareCard::load(&path).await.unwrap();
    assert_eq!(loaded, card);
}

#[tokio::test]
async fn test_loading_missing_share_card_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = ShareCard::load(dir.path().join("missing.json")).await;
    assert!(matches!(result, Err(grimoire_core::share::ShareError::Io(_))));
}
