#[path = "builder/client_builder.rs"]
mod client_builder;

#[path = "builder/state.rs"]
mod state;

#[path = "builder/resilience.rs"]
mod resilience;

#[path = "builder/credentials.rs"]
mod credentials;

pub use client_builder::ClientBuilder;
pub use credentials::{API_KEY_ENV_VARS, DEFAULT_BASE_URL, DEFAULT_MODEL};
