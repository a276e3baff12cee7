//! Session configuration.

use crate::oracle::OracleConfig;

/// Configuration for a new session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Seed for the shuffle and deck RNG. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Pause between the last review and the oracle becoming ready.
    pub review_complete_delay_ms: u64,

    /// How long the reveal flash lasts before the reading is shown.
    pub revelation_delay_ms: u64,

    /// How often the incantation text changes while the oracle thinks.
    pub incantation_phrase_interval_ms: u64,

    /// Model to use for the oracle.
    pub model: Option<String>,

    /// Maximum tokens for oracle responses.
    pub max_tokens: usize,

    /// Temperature for oracle generation.
    pub temperature: Option<f32>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            seed: None,
            review_complete_delay_ms: 1000,
            revelation_delay_ms: 1200,
            incantation_phrase_interval_ms: 1500,
            model: None,
            max_tokens: 1024,
            temperature: Some(0.8),
        }
    }

    /// Fix the RNG seed for reproducible shuffles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_review_complete_delay(mut self, ms: u64) -> Self {
        self.review_complete_delay_ms = ms;
        self
    }

    pub fn with_revelation_delay(mut self, ms: u64) -> Self {
        self.revelation_delay_ms = ms;
        self
    }

    pub fn with_incantation_interval(mut self, ms: u64) -> Self {
        self.incantation_phrase_interval_ms = ms;
        self
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Generation settings for [`ClaudeOracle`](crate::oracle::ClaudeOracle).
    pub fn oracle_config(&self) -> OracleConfig {
        OracleConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.review_complete_delay_ms, 1000);
        assert_eq!(config.revelation_delay_ms, 1200);
        assert_eq!(config.incantation_phrase_interval_ms, 1500);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_oracle_config_carries_generation_settings() {
        let config = SessionConfig::new()
            .with_model("claude-haiku")
            .with_max_tokens(512)
            .with_seed(7);
        let oracle = config.oracle_config();

        assert_eq!(oracle.model.as_deref(), Some("claude-haiku"));
        assert_eq!(oracle.max_tokens, 512);
        assert_eq!(config.seed, Some(7));
    }
}
