//! HTTP client for the Gemini Developer API.
//!
//! [`GeminiClient`] implements [`FileStore`](crate::files::FileStore) for the
//! Files API and [`GenerateTransport`](crate::chat::GenerateTransport) for the
//! generate endpoints, so the uploader and the streamer can be handed either
//! the real client or a test double.

#[path = "client/wire.rs"]
mod wire;

#[path = "client/files.rs"]
mod files;

#[path = "client/generate.rs"]
mod generate;

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::{
    chat::ResponseStreamer,
    error::LLMError,
    files::{FileUploader, PollConfig},
    retry::RetryConfig,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const API_VERSION: &str = "v1beta";

/// Configuration for the Gemini client.
#[derive(Debug)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: SecretString,
    /// Scheme and host of the API, without trailing slash.
    pub base_url: String,
    /// Model used when the caller does not name one.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// Retry policy for uploads and for opening generate requests.
    pub retry: RetryConfig,
    /// Activation polling for uploads.
    pub poll: PollConfig,
    /// Where upload scratch copies are written.
    pub scratch_dir: Option<PathBuf>,
}

/// Client for the Gemini API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: Arc<GeminiConfig>,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Creates a client around an existing HTTP client.
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Default model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Uploader backed by this client, configured from the client settings.
    pub fn uploader(&self) -> FileUploader {
        let uploader = FileUploader::new(Arc::new(self.clone()))
            .with_retry(self.config.retry.clone())
            .with_poll(self.config.poll.clone());
        match &self.config.scratch_dir {
            Some(dir) => uploader.with_scratch_dir(dir.clone()),
            None => uploader,
        }
    }

    /// Streamer backed by this client, sharing the upload retry policy.
    pub fn streamer(&self) -> ResponseStreamer {
        ResponseStreamer::new(Arc::new(self.clone())).with_retry(self.config.retry.clone())
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{API_VERSION}/{path}", self.config.base_url)
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/{API_VERSION}/files", self.config.base_url)
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        self.api_url(&format!("models/{model}:{method}"))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(API_KEY_HEADER, self.config.api_key.expose_secret())
    }

    fn log_request_payload<T: Serialize>(&self, label: &str, body: &T) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        if let Ok(json) = serde_json::to_string(body) {
            log::trace!("{label}: {json}");
        }
    }

    async fn ensure_success_response(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, LLMError> {
        log::debug!("{context} HTTP status: {}", response.status());
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let error_text = response.text().await?;
        Err(LLMError::from_status(status, &error_text))
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, LLMError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| LLMError::ResponseFormatError {
            message: format!("Failed to decode {context} response: {e}"),
            raw_response: text,
        })
    }
}
