use async_trait::async_trait;
use serde_json::Value;

use crate::error::LLMError;

use super::content::ContentPart;
use super::stream::RawEventStream;

/// Wire-level access to a generate endpoint.
///
/// Responses are handed over as raw JSON because the shape of text and
/// usage fields varies between endpoints and API versions.
#[async_trait]
pub trait GenerateTransport: Send + Sync {
    /// Sends the turn and returns the complete response.
    async fn generate(&self, model: &str, contents: &[ContentPart]) -> Result<Value, LLMError>;

    /// Sends the turn and returns the partial responses as they arrive.
    async fn stream_generate(
        &self,
        model: &str,
        contents: &[ContentPart],
    ) -> Result<RawEventStream, LLMError>;
}
