//! User configuration for the Caddyfile language server.
//!
//! Configuration is stored at `~/.config/caddy-ls/config.toml` (or the
//! platform's equivalent config directory).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// User configuration for the language server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    /// Default log level (`error`, `warn`, `info`, `debug`, `trace`), used
    /// when neither `RUST_LOG` nor `--log-level` is given.
    pub log_level: Option<String>,
}

/// Get the path to the user config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("caddy-ls").join("config.toml"))
}

/// Load the user configuration from its default location.
///
/// Returns `Ok(None)` if there is no config directory or no config file.
pub fn load_config() -> Result<Option<UserConfig>, LoadConfigError> {
    let Some(path) = config_path() else {
        debug!("No config directory available");
        return Ok(None);
    };
    load_config_from(&path)
}

/// Load the user configuration from `path`.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but couldn't be read or parsed.
pub fn load_config_from(path: &Path) -> Result<Option<UserConfig>, LoadConfigError> {
    if !path.exists() {
        debug!(?path, "Config file does not exist");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| LoadConfigError::Io {
        path: path.to_path_buf(),
        error: e,
    })?;

    let config: UserConfig = toml::from_str(&content).map_err(|e| LoadConfigError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    info!(?path, log_level = ?config.log_level, "Loaded user config");
    Ok(Some(config))
}

/// Error loading the user config.
#[derive(Debug)]
pub enum LoadConfigError {
    Io { path: PathBuf, error: std::io::Error },
    Parse { path: PathBuf, error: String },
}

impl std::fmt::Display for LoadConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadConfigError::Io { path, error } => {
                write!(f, "Failed to read config at {}: {}", path.display(), error)
            }
            LoadConfigError::Parse { path, error } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for LoadConfigError {}
