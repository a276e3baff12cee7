//! Integration tests that call the real Claude API.
//!
//! These tests require ANTHROPIC_API_KEY to be set (via .env file or environment).
//! Run with: `cargo test -p grimoire-core --test api_integration -- --ignored`
//!
//! These are marked #[ignore] by default to avoid:
//! - API costs in CI
//! - Test failures when no API key is available
//! - Slow test runs (API calls take seconds)

use grimoire_core::catalog::ArcanaId;
use grimoire_core::oracle::{ChatTurn, ClaudeOracle, Oracle, OracleConfig, OracleTopic, TarotReading};
use grimoire_core::testing::TestHarness;

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var("ANTHROPIC_API_KEY").is_ok_and(|key| !key.trim().is_empty())
}

fn oracle() -> ClaudeOracle {
    ClaudeOracle::from_env().with_config(OracleConfig {
        max_tokens: 1024,
        temperature: Some(0.7),
        ..OracleConfig::default()
    })
}

#[tokio::test]
#[ignore] // Run with: cargo test -p grimoire-core --test api_integration -- --ignored
async fn test_live_etymology() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let enrichment = oracle()
        .enrich_word("illuminate")
        .await
        .expect("etymology should succeed");

    assert!(!enrichment.components.is_empty(), "should break the word into parts");
    assert!(!enrichment.modern_meaning.is_empty());
    println!("{enrichment:#?}");
}

#[tokio::test]
#[ignore]
async fn test_live_reading_has_three_passages() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let cards = [ArcanaId::Star, ArcanaId::Chariot, ArcanaId::Empress];
    let reading = oracle()
        .read_tarot(&cards, OracleTopic::Decision)
        .await
        .expect("reading should not error with a key");

    // A transport failure degrades to the veiled reading; a real answer should not.
    assert_ne!(reading, TarotReading::fallback(OracleTopic::Decision));
    assert!(reading.cards.iter().all(|c| !c.title.is_empty()));
    println!("{reading:#?}");
}

#[tokio::test]
#[ignore]
async fn test_live_chat_uses_history() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let history = vec![
        ChatTurn::seeker("My favourite word today is 'lucid'."),
        ChatTurn::oracle("A fine choice, seeker. It shines with lux, light."),
    ];
    let reply = oracle()
        .chat(&history, "Which word did I say was my favourite?")
        .await
        .expect("chat should succeed");

    assert!(reply.to_lowercase().contains("lucid"), "reply was: {reply}");
}

#[tokio::test]
#[ignore]
async fn test_live_session_reaches_revelation() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let oracle = oracle();
    let mut harness = TestHarness::new();
    harness.draw_three().unwrap();
    harness.study_until_ready().unwrap();
    harness.flow.enter_oracle().unwrap();
    harness.flow.choose_topic(OracleTopic::Energy).unwrap();

    harness.flow.consult(&oracle, harness.now_ms).await.unwrap();
    harness.reveal();
    let card = harness.flow.crystallize().expect("reading should be revealed");
    println!("{}", card.to_text());
}

#[tokio::test]
async fn test_keyless_oracle_is_refused_without_network() {
    let oracle = ClaudeOracle::from_env();
    if oracle.has_credential() {
        return;
    }
    assert!(oracle.enrich_word("lucid").await.is_err());
}
