//! Settings loading.

use std::path::{Path, PathBuf};

use anyhow::Context;
use talkie_core::{Settings, settings_file_path};
use tracing::{debug, info};

/// Load settings from `path`, or from the default location.
///
/// An explicit path must exist. A missing default file means defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (default_path()?, false),
    };

    if !explicit && !path.exists() {
        debug!(path = %path.display(), "No settings file, using defaults");
        return Ok(Settings::with_defaults());
    }

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings = Settings::from_json_str(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    info!(path = %path.display(), "Loaded settings");
    Ok(settings)
}

fn default_path() -> anyhow::Result<PathBuf> {
    settings_file_path().context("Failed to resolve the settings location")
}
