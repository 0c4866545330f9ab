use std::path::Path;

use async_trait::async_trait;

use crate::error::LLMError;

use super::reference::RemoteFile;

/// Remote object store that holds attachments for the model API.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Uploads the file at `path` and returns the stored object.
    async fn upload_file(
        &self,
        path: &Path,
        display_name: &str,
        mime_type: &str,
    ) -> Result<RemoteFile, LLMError>;

    /// Fetches the current state of a stored object by resource name.
    async fn get_file(&self, name: &str) -> Result<RemoteFile, LLMError>;
}
