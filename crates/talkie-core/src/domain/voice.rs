//! Voices installed in the speech engine, and descriptors used to pick one.

use serde::{Deserialize, Serialize};

/// A voice as reported by the speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    /// Engine-specific voice name, e.g. `"Alex"`.
    pub name: String,

    /// BCP 47 language tag, e.g. `"en-US"`.
    pub lang: String,

    /// Whether synthesis happens locally rather than through a remote service.
    #[serde(default)]
    pub local_service: bool,

    /// Whether this is the engine's default voice.
    #[serde(default)]
    pub default: bool,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            local_service: true,
            default: false,
        }
    }

    /// Language group of this voice (see [`language_group`]).
    pub fn language_group(&self) -> &str {
        language_group(&self.lang)
    }
}

/// What the engine should speak with.
///
/// A descriptor without a name asks the engine for its default voice for
/// `lang`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lang: String,
}

impl VoiceDescriptor {
    /// Engine default voice for a language.
    pub fn for_language(lang: impl Into<String>) -> Self {
        Self {
            name: None,
            lang: lang.into(),
        }
    }

    /// A specific named voice.
    pub fn named(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            lang: lang.into(),
        }
    }
}

impl From<&Voice> for VoiceDescriptor {
    fn from(voice: &Voice) -> Self {
        Self::named(voice.name.clone(), voice.lang.clone())
    }
}

/// The language group of a language tag: its first two characters.
///
/// `"en-US"` and `"en-GB"` are both in group `"en"`.
pub fn language_group(lang: &str) -> &str {
    lang.char_indices()
        .nth(2)
        .map_or(lang, |(index, _)| &lang[..index])
}
