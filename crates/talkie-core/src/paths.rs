//! Configuration path resolution.
//!
//! Resolution order for the configuration root:
//! 1. `TALKIE_CONFIG_DIR` environment variable (highest priority)
//! 2. System configuration directory (e.g., `~/.config/talkie`)

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the configuration root.
pub const CONFIG_DIR_ENV: &str = "TALKIE_CONFIG_DIR";

/// File name of the settings file inside the configuration root.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system configuration directory.
    #[error("Cannot determine system config directory")]
    NoConfigDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,
}

/// Get the root directory for configuration.
pub fn config_root() -> Result<PathBuf, PathError> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if dir.trim().is_empty() {
            return Err(PathError::EmptyPath);
        }
        debug!(%dir, "Using config root from {CONFIG_DIR_ENV}");
        return Ok(PathBuf::from(dir));
    }

    dirs::config_dir()
        .map(|dir| dir.join("talkie"))
        .ok_or(PathError::NoConfigDir)
}

/// Location of the settings file.
pub fn settings_file_path() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join(SETTINGS_FILE_NAME))
}
