use std::path::PathBuf;

use crate::{files::PollConfig, retry::RetryConfig};

use super::{client_builder::ClientBuilder, state::BuilderState};

impl ClientBuilder {
    /// Sets the number of upload attempts, the first one included.
    pub fn upload_attempts(mut self, attempts: usize) -> Self {
        self.state.retry_attempts = Some(attempts);
        self
    }

    /// Sets the backoff step and ceiling in milliseconds.
    pub fn upload_backoff(mut self, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.state.retry_base_delay_ms = Some(base_delay_ms);
        self.state.retry_max_delay_ms = Some(max_delay_ms);
        self
    }

    /// Sets jitter toggle for backoff.
    pub fn upload_jitter(mut self, jitter: bool) -> Self {
        self.state.retry_jitter = Some(jitter);
        self
    }

    /// Sets how often and how many times to check that an upload is active.
    pub fn activation_poll(mut self, interval_ms: u64, max_polls: usize) -> Self {
        self.state.poll_interval_ms = Some(interval_ms);
        self.state.poll_max = Some(max_polls);
        self
    }

    /// Directory for the scratch copies written during uploads.
    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state.scratch_dir = Some(dir.into());
        self
    }
}

pub(super) fn retry_config(state: &BuilderState) -> RetryConfig {
    let defaults = RetryConfig::defaults();
    RetryConfig {
        max_attempts: state.retry_attempts.unwrap_or(defaults.max_attempts).max(1),
        base_delay_ms: state.retry_base_delay_ms.unwrap_or(defaults.base_delay_ms),
        max_delay_ms: state.retry_max_delay_ms.unwrap_or(defaults.max_delay_ms),
        jitter: state.retry_jitter.unwrap_or(defaults.jitter),
    }
}

pub(super) fn poll_config(state: &BuilderState) -> PollConfig {
    let defaults = PollConfig::default();
    PollConfig {
        interval_ms: state.poll_interval_ms.unwrap_or(defaults.interval_ms),
        max_polls: state.poll_max.unwrap_or(defaults.max_polls),
    }
}
