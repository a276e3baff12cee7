//! The Claude-backed oracle.

use super::prompts::{
    chat_request, etymology_request, reading_request, EtymologyPayload, ReadingPayload,
    ETYMOLOGIST_PROMPT, ORACLE_PROMPT, SAGE_PROMPT,
};
use super::{ChatTurn, Oracle, OracleError, OracleTopic, TarotReading, WordEnrichment};
use crate::deck::Reading;
use async_trait::async_trait;
use claude::{Claude, Message, Request};
use tracing::{debug, warn};

/// Generation settings for oracle requests.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// The model to use (defaults to the client's model).
    pub model: Option<String>,

    /// Maximum tokens for responses.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: Option<f32>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 1024,
            temperature: Some(0.8),
        }
    }
}

/// Oracle that asks Claude.
///
/// Built without a client when no key is configured; every call then fails
/// with [`OracleError::NoCredential`] before touching the network.
#[derive(Clone)]
pub struct ClaudeOracle {
    client: Option<Claude>,
    config: OracleConfig,
}

impl ClaudeOracle {
    pub fn new(client: Claude) -> Self {
        Self {
            client: Some(client),
            config: OracleConfig::default(),
        }
    }

    /// Create an oracle from the ANTHROPIC_API_KEY environment variable.
    pub fn from_env() -> Self {
        let client = match Claude::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "oracle has no credential; readings will be refused");
                None
            }
        };
        Self {
            client,
            config: OracleConfig::default(),
        }
    }

    pub fn with_config(mut self, config: OracleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn has_credential(&self) -> bool {
        self.client.is_some()
    }

    fn require_client(&self) -> Result<&Claude, OracleError> {
        self.client.as_ref().ok_or(OracleError::NoCredential)
    }

    fn request(&self, system: &str, prompt: String) -> Request {
        let mut request = Request::new(vec![Message::user(prompt)])
            .with_system(system)
            .with_max_tokens(self.config.max_tokens);
        if let Some(model) = &self.config.model {
            request = request.with_model(model.clone());
        }
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }

    async fn ask_for_reading(
        &self,
        client: &Claude,
        cards: &Reading,
        topic: OracleTopic,
    ) -> Result<TarotReading, OracleError> {
        let request = self.request(ORACLE_PROMPT, reading_request(cards, topic));
        let payload: ReadingPayload = client.extract(request, ReadingPayload::as_tool()).await?;
        TarotReading::try_from(payload)
    }
}

#[async_trait]
impl Oracle for ClaudeOracle {
    async fn enrich_word(&self, word: &str) -> Result<WordEnrichment, OracleError> {
        let client = self.require_client()?;
        debug!(word, "requesting etymology");

        let request = self.request(ETYMOLOGIST_PROMPT, etymology_request(word));
        let payload: EtymologyPayload =
            client.extract(request, EtymologyPayload::as_tool()).await?;
        Ok(payload.into())
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, OracleError> {
        let client = self.require_client()?;
        debug!(turns = history.len(), "sending chat message");

        let response = client
            .complete(self.request(SAGE_PROMPT, chat_request(history, message)))
            .await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(OracleError::Malformed("empty chat reply".to_string()));
        }
        Ok(text)
    }

    async fn read_tarot(
        &self,
        cards: &Reading,
        topic: OracleTopic,
    ) -> Result<TarotReading, OracleError> {
        let client = self.require_client()?;
        debug!(?cards, %topic, "requesting tarot reading");

        match self.ask_for_reading(client, cards, topic).await {
            Ok(reading) => Ok(reading),
            Err(e) => {
                warn!(error = %e, %topic, "tarot reading failed; using the veiled reading");
                Ok(TarotReading::fallback(topic))
            }
        }
    }
}
