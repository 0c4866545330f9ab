use serde::{Deserialize, Serialize};

/// Processing state of a file in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    Processing,
    Active,
    Failed,
    Unspecified,
    Other(String),
}

impl FileState {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "ACTIVE" | "READY" | "SUCCEEDED" => FileState::Active,
            "PROCESSING" => FileState::Processing,
            "FAILED" => FileState::Failed,
            "STATE_UNSPECIFIED" | "" => FileState::Unspecified,
            other => FileState::Other(other.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FileState::Active)
    }
}

/// File object as returned by the remote file store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Resource name, e.g. `files/abc-123`
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl RemoteFile {
    /// Processing state, if the store reported one.
    pub fn state(&self) -> Option<FileState> {
        self.state.as_deref().map(FileState::parse)
    }

    /// Identifier to refresh the file with, if the store reported one.
    pub fn id(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(self.name.as_str())
        }
    }
}

/// Handle to an attachment persisted in the remote file store.
///
/// Only produced by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedReference {
    file: RemoteFile,
    mime_type: String,
    name: String,
}

impl UploadedReference {
    pub(crate) fn new(
        file: RemoteFile,
        mime_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            file,
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Opaque handle the model API accepts: the file URI, or its resource
    /// name when the store returned no URI.
    pub fn handle(&self) -> &str {
        self.file.uri.as_deref().unwrap_or(&self.file.name)
    }

    pub fn file(&self) -> &RemoteFile {
        &self.file
    }

    /// MIME type declared at upload, falling back to the one the store
    /// reported.
    pub fn mime_type(&self) -> &str {
        if self.mime_type.is_empty() {
            self.file.mime_type.as_deref().unwrap_or(super::OCTET_STREAM)
        } else {
            &self.mime_type
        }
    }

    /// Original attachment name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
