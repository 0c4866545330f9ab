//! Bounded retry with capped backoff, expressed as an explicit state machine.

#[path = "retry/config.rs"]
mod config;

#[path = "retry/state.rs"]
mod state;

pub use config::RetryConfig;
pub use state::{run, RetryState};
