use std::path::PathBuf;

use secrecy::SecretString;

#[derive(Default)]
pub(crate) struct BuilderState {
    pub(crate) api_key: Option<SecretString>,
    pub(crate) base_url: Option<String>,
    pub(crate) model: Option<String>,
    pub(crate) timeout_seconds: Option<u64>,
    pub(crate) ambient_credentials: bool,
    pub(crate) retry_attempts: Option<usize>,
    pub(crate) retry_base_delay_ms: Option<u64>,
    pub(crate) retry_max_delay_ms: Option<u64>,
    pub(crate) retry_jitter: Option<bool>,
    pub(crate) poll_interval_ms: Option<u64>,
    pub(crate) poll_max: Option<usize>,
    pub(crate) scratch_dir: Option<PathBuf>,
}

impl BuilderState {
    pub(crate) fn new() -> Self {
        Self {
            ambient_credentials: true,
            ..Self::default()
        }
    }
}
