use std::time::Duration;

use secrecy::SecretString;

use crate::{
    client::{GeminiClient, GeminiConfig},
    error::LLMError,
};

use super::{credentials, resilience, state::BuilderState};

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Builder for configuring and instantiating a [`GeminiClient`].
pub struct ClientBuilder {
    pub(super) state: BuilderState,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            state: BuilderState::new(),
        }
    }
}

impl ClientBuilder {
    /// Creates a new empty builder instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.state.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Whether to look for the key in the environment and the secret store
    /// when none was set explicitly. Enabled by default.
    pub fn ambient_credentials(mut self, enable: bool) -> Self {
        self.state.ambient_credentials = enable;
        self
    }

    /// Sets the base URL for API requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.state.base_url = Some(url.into());
        self
    }

    /// Sets the default model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.state.model = Some(model.into());
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.state.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Builds the client.
    ///
    /// Fails with [`LLMError::Config`] when no API key can be found.
    pub fn build(mut self) -> Result<GeminiClient, LLMError> {
        let api_key = credentials::require_api_key(&mut self.state)?;
        let timeout_seconds = self.state.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        let base_url = self
            .state
            .base_url
            .take()
            .unwrap_or_else(|| credentials::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let config = GeminiConfig {
            api_key,
            base_url,
            model: self
                .state
                .model
                .take()
                .unwrap_or_else(|| credentials::DEFAULT_MODEL.to_string()),
            timeout_seconds: Some(timeout_seconds),
            retry: resilience::retry_config(&self.state),
            poll: resilience::poll_config(&self.state),
            scratch_dir: self.state.scratch_dir.take(),
        };
        log::debug!(
            "Building Gemini client. base_url={} model={} timeout={}s attempts={}",
            config.base_url,
            config.model,
            timeout_seconds,
            config.retry.max_attempts,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| LLMError::Config(format!("could not build HTTP client: {e}")))?;
        Ok(GeminiClient::with_client(client, config))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = ClientBuilder::new()
            .ambient_credentials(false)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, LLMError::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_key_is_rejected() {
        let result = ClientBuilder::new()
            .api_key("   ")
            .ambient_credentials(false)
            .build();
        assert!(matches!(result, Err(LLMError::Config(_))));
    }

    #[test]
    fn applies_defaults_and_overrides() {
        let client = ClientBuilder::new()
            .api_key("k")
            .base_url("http://localhost:9000/")
            .upload_attempts(2)
            .upload_backoff(10, 20)
            .activation_poll(5, 3)
            .build()
            .unwrap();

        let config = client.config();
        assert_eq!(config.api_key.expose_secret(), "k");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.model, credentials::DEFAULT_MODEL);
        assert_eq!(config.timeout_seconds, Some(DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.base_delay_ms, 10);
        assert_eq!(config.retry.max_delay_ms, 20);
        assert!(config.retry.jitter);
        assert_eq!(config.poll.interval_ms, 5);
        assert_eq!(config.poll.max_polls, 3);
    }
}
