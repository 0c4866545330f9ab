use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::LLMError;

use super::config::RetryConfig;

/// Where a retry loop stands after an attempt.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug)]
pub enum RetryState<T> {
    /// Another attempt should be made once `delay` has elapsed.
    Pending {
        next_attempt: usize,
        delay: Duration,
        last_error: LLMError,
    },
    /// The operation produced a value.
    Succeeded { value: T, attempts: usize },
    /// Every attempt failed with a transient error.
    Exhausted { attempts: usize, last_error: LLMError },
    /// The operation failed with an error that must not be retried.
    NonRetryable { attempts: usize, error: LLMError },
}

impl<T> RetryState<T> {
    /// Applies the outcome of attempt `attempt` (1-based) to the policy.
    pub fn after_attempt(cfg: &RetryConfig, attempt: usize, result: Result<T, LLMError>) -> Self {
        match result {
            Ok(value) => RetryState::Succeeded {
                value,
                attempts: attempt,
            },
            Err(error) if !error.is_transient() => RetryState::NonRetryable {
                attempts: attempt,
                error,
            },
            Err(last_error) if attempt >= cfg.max_attempts => RetryState::Exhausted {
                attempts: attempt,
                last_error,
            },
            Err(last_error) => RetryState::Pending {
                next_attempt: attempt + 1,
                delay: cfg.delay_for(attempt),
                last_error,
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RetryState::Pending { .. })
    }

    /// Number of attempts made so far.
    pub fn attempts(&self) -> usize {
        match self {
            RetryState::Pending { next_attempt, .. } => next_attempt - 1,
            RetryState::Succeeded { attempts, .. }
            | RetryState::Exhausted { attempts, .. }
            | RetryState::NonRetryable { attempts, .. } => *attempts,
        }
    }

    pub fn into_result(self) -> Result<T, LLMError> {
        match self {
            RetryState::Succeeded { value, .. } => Ok(value),
            RetryState::Exhausted {
                attempts,
                last_error,
            } => Err(LLMError::RetryExceeded {
                attempts,
                last_error: Box::new(last_error),
            }),
            RetryState::NonRetryable { error, .. } => Err(error),
            RetryState::Pending { last_error, .. } => Err(last_error),
        }
    }
}

/// Drives `op` until the policy reaches a terminal state.
///
/// `op` receives the 1-based attempt number. The returned state is never
/// `Pending`.
pub async fn run<F, Fut, T>(cfg: &RetryConfig, label: &str, mut op: F) -> RetryState<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, LLMError>>,
{
    let mut attempt = 1usize;
    loop {
        let state = RetryState::after_attempt(cfg, attempt, op(attempt).await);
        match state {
            RetryState::Pending {
                next_attempt,
                delay,
                last_error,
            } => {
                log::warn!(
                    "{label} attempt {attempt}/{} failed, retrying in {delay:?}: {last_error}",
                    cfg.max_attempts
                );
                sleep(delay).await;
                attempt = next_attempt;
            }
            terminal => {
                log::debug!("{label} finished after {} attempt(s)", terminal.attempts());
                return terminal;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn unavailable() -> LLMError {
        LLMError::from_status(503, "Service Unavailable")
    }

    #[test]
    fn transient_failure_before_budget_is_pending() {
        let cfg = RetryConfig::immediate(4);
        let state = RetryState::<()>::after_attempt(&cfg, 2, Err(unavailable()));
        assert!(matches!(state, RetryState::Pending { next_attempt: 3, .. }));
        assert!(!state.is_terminal());
        assert_eq!(state.attempts(), 2);
    }

    #[test]
    fn transient_failure_on_last_attempt_is_exhausted() {
        let cfg = RetryConfig::immediate(4);
        let state = RetryState::<()>::after_attempt(&cfg, 4, Err(unavailable()));
        assert!(matches!(state, RetryState::Exhausted { attempts: 4, .. }));
        assert!(matches!(
            state.into_result(),
            Err(LLMError::RetryExceeded { attempts: 4, .. })
        ));
    }

    #[test]
    fn permanent_failure_is_non_retryable() {
        let cfg = RetryConfig::immediate(4);
        let state =
            RetryState::<()>::after_attempt(&cfg, 1, Err(LLMError::from_status(400, "bad")));
        assert!(matches!(state, RetryState::NonRetryable { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn run_stops_at_first_success() {
        let calls = AtomicUsize::new(0);
        let cfg = RetryConfig::immediate(4);
        let state = run(&cfg, "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(unavailable())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert!(matches!(
            state,
            RetryState::Succeeded {
                value: 3,
                attempts: 3
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
