use async_trait::async_trait;
use serde_json::Value;

use crate::{
    chat::{create_sse_stream, parse_json_event, ContentPart, GenerateTransport, RawEventStream},
    error::LLMError,
};

use super::{wire::GenerateRequest, GeminiClient};

#[async_trait]
impl GenerateTransport for GeminiClient {
    async fn generate(&self, model: &str, contents: &[ContentPart]) -> Result<Value, LLMError> {
        let body = GenerateRequest::from_contents(contents);
        self.log_request_payload("Gemini request payload", &body);

        let response = self
            .authorized(self.client.post(self.model_url(model, "generateContent")))
            .json(&body)
            .send()
            .await?;
        let response = self.ensure_success_response(response, "Gemini generate").await?;
        Self::parse_json(response, "Gemini generate").await
    }

    async fn stream_generate(
        &self,
        model: &str,
        contents: &[ContentPart],
    ) -> Result<RawEventStream, LLMError> {
        let body = GenerateRequest::from_contents(contents);
        self.log_request_payload("Gemini stream payload", &body);

        let response = self
            .authorized(self.client.post(self.model_url(model, "streamGenerateContent")))
            .query(&[("alt", "sse")])
            .json(&body)
            .send()
            .await?;
        let response = self.ensure_success_response(response, "Gemini stream").await?;
        Ok(create_sse_stream(response, parse_json_event))
    }
}
