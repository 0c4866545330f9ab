use serde::{Deserialize, Serialize};

use gemini_chat::{files::PollConfig, retry::RetryConfig, session::HistoryConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub upload: UploadConfig,
    pub history: HistorySection,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
    pub poll_interval_ms: u64,
    pub max_polls: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        let retry = RetryConfig::defaults();
        let poll = PollConfig::default();
        Self {
            max_attempts: retry.max_attempts,
            base_delay_ms: retry.base_delay_ms,
            max_delay_ms: retry.max_delay_ms,
            jitter: retry.jitter,
            poll_interval_ms: poll.interval_ms,
            max_polls: poll.max_polls,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistorySection {
    pub max_turns: usize,
    pub max_chars: usize,
    pub max_pinned: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        let defaults = HistoryConfig::default();
        Self {
            max_turns: defaults.max_turns,
            max_chars: defaults.max_chars,
            max_pinned: defaults.max_pinned,
        }
    }
}

impl From<&HistorySection> for HistoryConfig {
    fn from(section: &HistorySection) -> Self {
        Self {
            max_turns: section.max_turns,
            max_chars: section.max_chars,
            max_pinned: section.max_pinned,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
