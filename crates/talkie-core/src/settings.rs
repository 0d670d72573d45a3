//! Settings domain types and validation.
//!
//! This module contains the configuration the background reads at startup.
//! These are pure domain types; loading them from disk is the binary's job.

use serde::{Deserialize, Serialize};

/// Language used when nothing else about a text's language is known.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default upper bound on the length of one synthesis segment.
pub const DEFAULT_MAX_SEGMENT_CHARS: usize = 100;

/// Default delay before the browser-action icon reflects a lifecycle change.
pub const DEFAULT_ICON_UPDATE_DELAY_MS: u64 = 10;

/// Message spoken when a page does not allow reading its selection.
const DEFAULT_NOT_ABLE_TO_SPEAK_MESSAGE: &str =
    "I'm sorry, I can't read text from this kind of page. Try another tab.";

/// Links opened by the `open-website-*` commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WebsiteUrls {
    pub main: String,
    pub chromewebstore: String,
    pub donate: String,
}

impl Default for WebsiteUrls {
    fn default() -> Self {
        Self {
            main: "https://joelpurra.com/projects/talkie/".to_string(),
            chromewebstore: "https://chrome.google.com/webstore/search/talkie".to_string(),
            donate: "https://joelpurra.com/donate/".to_string(),
        }
    }
}

/// Background settings.
///
/// Missing fields in a settings file fall back to [`Settings::with_defaults`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Last-resort language for texts without any language hint.
    pub default_language: String,

    /// Locale of the browser UI.
    pub ui_locale: String,

    /// Locale of the bundled messages; the restricted-tab message is spoken in it.
    pub messages_locale: String,

    /// Maximum number of characters per synthesis segment.
    pub max_segment_chars: usize,

    /// Delay before icon changes are applied after a lifecycle event.
    pub icon_update_delay_ms: u64,

    /// Localized "cannot speak here" message.
    pub not_able_to_speak_message: String,

    /// Links for the website commands.
    pub websites: WebsiteUrls,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            ui_locale: DEFAULT_LANGUAGE.to_string(),
            messages_locale: DEFAULT_LANGUAGE.to_string(),
            max_segment_chars: DEFAULT_MAX_SEGMENT_CHARS,
            icon_update_delay_ms: DEFAULT_ICON_UPDATE_DELAY_MS,
            not_able_to_speak_message: DEFAULT_NOT_ABLE_TO_SPEAK_MESSAGE.to_string(),
            websites: WebsiteUrls::default(),
        }
    }

    /// Parse settings from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        validate_settings(&settings)?;
        Ok(settings)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Settings could not be parsed: {0}")]
    Parse(String),

    #[error("Max segment length must be between 10 and 32,767 characters, got {0}")]
    InvalidSegmentLength(usize),

    #[error("Icon update delay must be at most 1000 ms, got {0}")]
    InvalidIconDelay(u64),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if !(10..=32_767).contains(&settings.max_segment_chars) {
        return Err(SettingsError::InvalidSegmentLength(
            settings.max_segment_chars,
        ));
    }

    if settings.icon_update_delay_ms > 1000 {
        return Err(SettingsError::InvalidIconDelay(
            settings.icon_update_delay_ms,
        ));
    }

    let required = [
        ("default_language", &settings.default_language),
        ("ui_locale", &settings.ui_locale),
        ("messages_locale", &settings.messages_locale),
        ("not_able_to_speak_message", &settings.not_able_to_speak_message),
    ];
    if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(SettingsError::EmptyField(*name));
    }

    Ok(())
}
