use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use tokio::time::sleep;

use crate::error::LLMError;
use crate::retry::{self, RetryConfig};

use super::mime::{mime_for_name, Attachment};
use super::poll::{PollConfig, PollOutcome, PollStep};
use super::reference::{RemoteFile, UploadedReference};
use super::scratch::ScratchFile;
use super::store::FileStore;

/// Uploads attachments to a [`FileStore`], retrying transient failures and
/// briefly waiting for the stored file to become active.
#[derive(Clone)]
pub struct FileUploader {
    store: Arc<dyn FileStore>,
    retry: RetryConfig,
    poll: PollConfig,
    scratch_dir: Option<PathBuf>,
}

impl FileUploader {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self {
            store,
            retry: RetryConfig::defaults(),
            poll: PollConfig::default(),
            scratch_dir: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Directory for scratch copies; the system temp dir when unset.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Uploads `bytes` under `name`.
    ///
    /// `declared_mime` overrides the type inferred from the extension. The
    /// scratch copy written for the call is removed whatever the outcome.
    pub async fn upload(
        &self,
        name: &str,
        bytes: &[u8],
        declared_mime: Option<&str>,
    ) -> Result<UploadedReference, LLMError> {
        let mime_type = declared_mime.unwrap_or_else(|| mime_for_name(name));
        let scratch = ScratchFile::write(name, bytes, self.scratch_dir.as_deref())?;
        let result = self.upload_scratch(scratch.path(), name, mime_type).await;
        scratch.release();
        result
    }

    pub async fn upload_attachment(
        &self,
        attachment: &Attachment,
    ) -> Result<UploadedReference, LLMError> {
        self.upload(
            &attachment.name,
            &attachment.bytes,
            Some(attachment.mime_type.as_str()),
        )
        .await
    }

    /// Uploads several attachments concurrently.
    ///
    /// References come back in input order; the first failure fails the batch.
    pub async fn upload_all(
        &self,
        attachments: &[Attachment],
    ) -> Result<Vec<UploadedReference>, LLMError> {
        try_join_all(attachments.iter().map(|a| self.upload_attachment(a))).await
    }

    async fn upload_scratch(
        &self,
        path: &Path,
        name: &str,
        mime_type: &str,
    ) -> Result<UploadedReference, LLMError> {
        let label = format!("upload of {name}");
        let file = retry::run(&self.retry, &label, |_| {
            self.store.upload_file(path, name, mime_type)
        })
        .await
        .into_result()?;
        log::debug!("uploaded {name} as {}", file.name);

        let (file, outcome) = self.wait_until_active(file).await;
        match outcome {
            PollOutcome::TimedOut { polls } => log::warn!(
                "{} still not active after {polls} polls, sending it anyway",
                file.name
            ),
            PollOutcome::Failed { .. } => {
                log::warn!("{} failed processing on the server", file.name)
            }
            _ => {}
        }
        Ok(UploadedReference::new(file, mime_type, name))
    }

    /// Refreshes the file state until it is active or the poll budget runs
    /// out. The last known object is returned in every case.
    async fn wait_until_active(&self, mut file: RemoteFile) -> (RemoteFile, PollOutcome) {
        let (Some(mut state), Some(id)) = (file.state(), file.id().map(str::to_string)) else {
            return (file, PollOutcome::Skipped);
        };
        let mut polls = 0usize;
        loop {
            match self.poll.step(polls, &state) {
                PollStep::Done(outcome) => return (file, outcome),
                PollStep::Wait(interval) => sleep(interval).await,
            }
            polls += 1;
            match self.store.get_file(&id).await {
                Ok(refreshed) => {
                    let Some(next) = refreshed.state() else {
                        return (refreshed, PollOutcome::Skipped);
                    };
                    file = refreshed;
                    state = next;
                }
                Err(err) => {
                    log::warn!("could not refresh state of {id}: {err}");
                    return (file, PollOutcome::Interrupted { polls });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "uploader_tests.rs"]
mod tests;
