use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::{
    error::LLMError,
    files::{FileStore, RemoteFile},
};

use super::{
    wire::{UploadFileMetadata, UploadMetadata, UploadResponse},
    GeminiClient,
};

const UPLOAD_PROTOCOL_HEADER: &str = "X-Goog-Upload-Protocol";

#[async_trait]
impl FileStore for GeminiClient {
    async fn upload_file(
        &self,
        path: &Path,
        display_name: &str,
        mime_type: &str,
    ) -> Result<RemoteFile, LLMError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(display_name)
            .to_string();
        let metadata = UploadMetadata {
            file: UploadFileMetadata { display_name },
        };
        self.log_request_payload("Gemini upload metadata", &metadata);

        let form = Form::new()
            .part(
                "metadata",
                Part::text(serde_json::to_string(&metadata)?).mime_str("application/json")?,
            )
            .part(
                "file",
                Part::bytes(bytes).file_name(file_name).mime_str(mime_type)?,
            );

        let response = self
            .authorized(self.client.post(self.upload_url()))
            .header(UPLOAD_PROTOCOL_HEADER, "multipart")
            .multipart(form)
            .send()
            .await?;
        let response = self.ensure_success_response(response, "Gemini upload").await?;
        let uploaded: UploadResponse = Self::parse_json(response, "Gemini upload").await?;
        Ok(uploaded.file)
    }

    async fn get_file(&self, name: &str) -> Result<RemoteFile, LLMError> {
        let response = self
            .authorized(self.client.get(self.api_url(name)))
            .send()
            .await?;
        let response = self.ensure_success_response(response, "Gemini file lookup").await?;
        Self::parse_json(response, "Gemini file lookup").await
    }
}
