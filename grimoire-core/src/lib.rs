//! Tarot-themed vocabulary study with an AI oracle.
//!
//! This crate provides:
//! - The grimoire, arcana and vocabulary catalogs
//! - A draw table, study deck builder and flashcard review loop
//! - The oracle ritual, driven by a logical clock
//! - A Claude-backed oracle for etymology, chat and tarot readings
//!
//! # Quick Start
//!
//! ```ignore
//! use grimoire_core::{ClaudeOracle, FlowController, GrimoireId, OracleTopic, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new().with_seed(42);
//!     let oracle = ClaudeOracle::from_env().with_config(config.oracle_config());
//!     let mut flow = FlowController::new(config);
//!
//!     flow.select_book(GrimoireId::EmberCodex)?;
//!     flow.start()?;
//!     for _ in 0..3 {
//!         flow.draw()?;
//!     }
//!     flow.accept_prophecy()?;
//!     // ... review until the oracle is ready, then:
//!     flow.enter_oracle()?;
//!     flow.choose_topic(OracleTopic::Love)?;
//!     flow.consult(&oracle, 0).await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod deck;
pub mod draw;
pub mod filter;
pub mod flow;
pub mod oracle;
pub mod prophecy;
pub mod review;
pub mod ritual;
pub mod share;
pub mod testing;
pub mod timer;

// Re-export for convenience
pub use grimoire_macros::Tool;

// Primary public API
pub use catalog::{vocabulary, ArcanaId, GrimoireId, WordData};
pub use config::SessionConfig;
pub use deck::Reading;
pub use flow::{FlowController, FlowError, FlowEvent, FlowState, Tab, View};
pub use oracle::{ClaudeOracle, Oracle, OracleError, OracleTopic, TarotReading};
pub use review::Decision;
pub use ritual::RitualStage;
pub use share::ShareCard;
pub use testing::{MockOracle, TestHarness};
