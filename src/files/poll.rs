use std::time::Duration;

use super::reference::FileState;

const DEFAULT_INTERVAL_MS: u64 = 500;
const DEFAULT_MAX_POLLS: usize = 12;

/// How long to wait for an uploaded file to become active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two state refreshes
    pub interval_ms: u64,
    /// Maximum number of state refreshes
    pub max_polls: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Decides what to do after observing `state` with `polls` refreshes
    /// already spent.
    pub fn step(&self, polls: usize, state: &FileState) -> PollStep {
        match state {
            FileState::Active => PollStep::Done(PollOutcome::Active { polls }),
            FileState::Failed => PollStep::Done(PollOutcome::Failed { polls }),
            _ if polls >= self.max_polls => PollStep::Done(PollOutcome::TimedOut { polls }),
            _ => PollStep::Wait(self.interval()),
        }
    }
}

/// Next move of the activation poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// Refresh the state again after the given pause.
    Wait(Duration),
    Done(PollOutcome),
}

/// How the activation poll loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The file reached an active state.
    Active { polls: usize },
    /// The store reported that processing failed.
    Failed { polls: usize },
    /// The poll budget ran out before the file became active.
    TimedOut { polls: usize },
    /// The store reported no identifier or no state, so nothing was polled.
    Skipped,
    /// Refreshing the state failed; the last known object is kept.
    Interrupted { polls: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_state_finishes_immediately() {
        let cfg = PollConfig::default();
        assert_eq!(
            cfg.step(0, &FileState::Active),
            PollStep::Done(PollOutcome::Active { polls: 0 })
        );
    }

    #[test]
    fn processing_waits_until_budget_is_spent() {
        let cfg = PollConfig::default();
        assert_eq!(
            cfg.step(11, &FileState::Processing),
            PollStep::Wait(Duration::from_millis(500))
        );
        assert_eq!(
            cfg.step(12, &FileState::Processing),
            PollStep::Done(PollOutcome::TimedOut { polls: 12 })
        );
    }

    #[test]
    fn failed_state_stops_polling() {
        let cfg = PollConfig::default();
        assert_eq!(
            cfg.step(3, &FileState::Failed),
            PollStep::Done(PollOutcome::Failed { polls: 3 })
        );
    }
}
