use std::time::Duration;

use rand::Rng;

/// Configuration for retry and backoff behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts including the first one
    pub max_attempts: usize,
    /// Backoff step in milliseconds, multiplied by the attempt number
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds, before jitter
    pub max_delay_ms: u64,
    /// Whether to add random jitter to backoff delays
    pub jitter: bool,
}

const DEFAULT_MAX_ATTEMPTS: usize = 4;
const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
const DEFAULT_MAX_DELAY_MS: u64 = 4_000;

impl Default for RetryConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl RetryConfig {
    /// Creates a default configuration with sane values.
    pub fn defaults() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            jitter: true,
        }
    }

    /// Same attempt budget with no waiting between attempts.
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
            jitter: false,
        }
    }

    /// Delay before the next attempt once attempt `failed_attempt` (1-based)
    /// has failed, without jitter.
    ///
    /// Grows as `base * n + base / 4 * sqrt(n)` and is capped at `max_delay_ms`.
    pub fn base_delay(&self, failed_attempt: usize) -> Duration {
        let n = failed_attempt.max(1) as f64;
        let base = self.base_delay_ms as f64;
        let raw = base * n + 0.25 * base * n.sqrt();
        let capped = raw.min(self.max_delay_ms as f64);
        Duration::from_millis(capped.round() as u64)
    }

    /// Delay before the next attempt, jitter included.
    pub fn delay_for(&self, failed_attempt: usize) -> Duration {
        let delay = self.base_delay(failed_attempt);
        if !self.jitter {
            return delay;
        }
        let span = self.base_delay_ms / 4;
        if span == 0 {
            return delay;
        }
        let jitter = rand::thread_rng().gen_range(0..=span);
        delay + Duration::from_millis(jitter)
    }
}
