use std::path::PathBuf;

use super::error::ConfigError;

/// Location of the config file: the override if given, else
/// `~/.config/gemini-chat/config.toml`.
pub fn resolve_config_file(config_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = config_override {
        return Ok(path);
    }
    let home = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
    Ok(home.join(".config").join("gemini-chat").join("config.toml"))
}
