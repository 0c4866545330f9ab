use secrecy::{ExposeSecret, SecretString};

use crate::{error::LLMError, secret_store::SecretStore};

use super::state::BuilderState;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Resolves the API key: explicit value, then environment, then the secret
/// store.
pub(super) fn require_api_key(state: &mut BuilderState) -> Result<SecretString, LLMError> {
    if let Some(key) = state.api_key.take() {
        return non_blank(key).ok_or_else(missing_key);
    }
    if !state.ambient_credentials {
        return Err(missing_key());
    }
    if let Some(key) = from_env() {
        return Ok(key);
    }
    match SecretStore::new() {
        Ok(store) => store.api_key().and_then(non_blank).ok_or_else(missing_key),
        Err(err) => {
            log::debug!("secret store unavailable: {err}");
            Err(missing_key())
        }
    }
}

fn from_env() -> Option<SecretString> {
    API_KEY_ENV_VARS.iter().find_map(|var| {
        let key = non_blank(SecretString::new(std::env::var(var).ok()?))?;
        log::debug!("using API key from {var}");
        Some(key)
    })
}

fn non_blank(key: SecretString) -> Option<SecretString> {
    if key.expose_secret().trim().is_empty() {
        None
    } else {
        Some(key)
    }
}

fn missing_key() -> LLMError {
    LLMError::Config(format!(
        "Missing Gemini API key. Set {} or {}, or store one with `gemini-chat set-key`.",
        API_KEY_ENV_VARS[0], API_KEY_ENV_VARS[1]
    ))
}
