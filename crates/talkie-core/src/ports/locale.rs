//! Locale and message provider port.

use std::collections::HashMap;

use crate::settings::Settings;

/// Message key of the text spoken on pages the extension cannot read.
pub const NOT_ABLE_TO_SPEAK_KEY: &str = "notAbleToSpeakTextFromThisSpecialTab";

/// Port for locale information and localized messages.
pub trait LocaleProvider: Send + Sync {
    /// Locale of the browser UI, e.g. `"en-US"`.
    fn ui_locale(&self) -> String;

    /// Locale the bundled messages are written in.
    fn messages_locale(&self) -> String;

    /// Localized message for `key`, if one exists.
    fn message(&self, key: &str) -> Option<String>;
}

/// Locale provider with a fixed message table.
#[derive(Debug, Clone)]
pub struct StaticLocale {
    ui_locale: String,
    messages_locale: String,
    messages: HashMap<String, String>,
}

impl StaticLocale {
    pub fn new(ui_locale: impl Into<String>, messages_locale: impl Into<String>) -> Self {
        Self {
            ui_locale: ui_locale.into(),
            messages_locale: messages_locale.into(),
            messages: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }

    /// Locale provider configured from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.ui_locale.clone(), settings.messages_locale.clone())
            .with_message(NOT_ABLE_TO_SPEAK_KEY, settings.not_able_to_speak_message.clone())
    }
}

impl LocaleProvider for StaticLocale {
    fn ui_locale(&self) -> String {
        self.ui_locale.clone()
    }

    fn messages_locale(&self) -> String {
        self.messages_locale.clone()
    }

    fn message(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_settings() {
        let settings = Settings {
            messages_locale: "sv".to_string(),
            not_able_to_speak_message: "Det går inte här.".to_string(),
            ..Settings::with_defaults()
        };
        let locale = StaticLocale::from_settings(&settings);
        assert_eq!(locale.messages_locale(), "sv");
        assert_eq!(
            locale.message(NOT_ABLE_TO_SPEAK_KEY).as_deref(),
            Some("Det går inte här.")
        );
        assert!(locale.message("unknownKey").is_none());
    }
}
