use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::paths::resolve_config_file;
use super::types::AppConfig;

/// Reads the config file; a missing file yields the defaults.
pub fn load_config(path_override: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let path = resolve_config_file(path_override)?;
    read_config(&path)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => Err(ConfigError::Io(err)),
    }
}
