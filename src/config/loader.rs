//! Settings file discovery, loading and saving.
//!
//! Nothing here logs: settings are read before the logger exists, so the
//! caller receives a [`ConfigSource`] and reports it once logging is up.

use crate::config::SetupConfig;
use crate::error::ConfigError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Per-user settings location below the home directory
const USER_SETTINGS: &str = ".config/bl602-setup/settings.json";

/// Where the effective settings came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config FILE`
    Explicit(PathBuf),
    /// `~/.config/bl602-setup/settings.json`
    User(PathBuf),
    Defaults,
}

impl ConfigSource {
    /// One line for the session log
    pub fn describe(&self) -> String {
        match self {
            ConfigSource::Explicit(path) => format!("Loading settings from {}", path.display()),
            ConfigSource::User(path) => format!("Loading user settings from {}", path.display()),
            ConfigSource::Defaults => "No settings file, using built-in defaults".to_string(),
        }
    }
}

/// `~/.config/bl602-setup/settings.json`
pub fn get_global_settings_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(USER_SETTINGS))
        .ok_or_else(|| ConfigError::ValidationFailed("Cannot determine home directory".into()))
}

/// Only `.json` files are accepted as settings.
pub fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed("Settings path is empty".into()));
    }
    if path.extension().map_or(true, |ext| ext != "json") {
        return Err(ConfigError::ValidationFailed(format!(
            "Settings file {} is not a .json file",
            path.display()
        )));
    }
    Ok(())
}

/// Parse a settings file; absent keys take their defaults.
pub fn load_config_from_file(path: &Path) -> Result<SetupConfig, ConfigError> {
    validate_config_path(path)?;

    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()),
        _ => ConfigError::IoError(e),
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write `config` as pretty JSON, creating parent directories.
pub fn save_config_to_file(config: &SetupConfig, path: &Path) -> Result<(), ConfigError> {
    validate_config_path(path)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}

/// Resolve the settings for this run.
///
/// An explicit path must exist. Without one, the per-user settings file is
/// used when present, otherwise the built-in defaults.
pub fn load_effective_config(
    explicit: Option<&Path>,
) -> Result<(SetupConfig, ConfigSource), ConfigError> {
    if let Some(path) = explicit {
        let config = load_config_from_file(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    match get_global_settings_path() {
        Ok(path) if path.is_file() => {
            let config = load_config_from_file(&path)?;
            Ok((config, ConfigSource::User(path)))
        }
        _ => Ok((SetupConfig::default(), ConfigSource::Defaults)),
    }
}
