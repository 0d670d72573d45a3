//! Speech lifecycle events.
//!
//! This module is the single source of truth for the events the speaker
//! broadcasts and the observers (icon, popup, suspension, progress, speaking
//! status) listen to.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "before_speaking", "text": "Hello world" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload-less identifier of a lifecycle point.
///
/// Listeners register against an `EventKind`; the broadcaster dispatches a
/// [`SpeechEvent`] to every listener registered for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    BeforeSpeaking,
    BeforeSpeakingPart,
    AfterSpeakingPart,
    AfterSpeaking,
    StopSpeaking,
}

impl EventKind {
    /// Every kind, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::BeforeSpeaking,
        Self::BeforeSpeakingPart,
        Self::AfterSpeakingPart,
        Self::AfterSpeaking,
        Self::StopSpeaking,
    ];

    /// Event name as used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeSpeaking => "beforeSpeaking",
            Self::BeforeSpeakingPart => "beforeSpeakingPart",
            Self::AfterSpeakingPart => "afterSpeakingPart",
            Self::AfterSpeaking => "afterSpeaking",
            Self::StopSpeaking => "stopSpeaking",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lifecycle event together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechEvent {
    /// A text is about to be spoken.
    BeforeSpeaking {
        /// The full text of the utterance.
        text: String,
    },

    /// A segment of the current text is about to be spoken.
    BeforeSpeakingPart {
        /// The segment text.
        #[serde(rename = "textPart")]
        text_part: String,
    },

    /// A segment of the current text finished speaking.
    AfterSpeakingPart {
        /// The segment text.
        #[serde(rename = "textPart")]
        text_part: String,
    },

    /// The current text finished speaking, failed, or was stopped.
    AfterSpeaking,

    /// A stop was requested.
    StopSpeaking,
}

impl SpeechEvent {
    pub fn before_speaking(text: impl Into<String>) -> Self {
        Self::BeforeSpeaking { text: text.into() }
    }

    pub fn before_speaking_part(text_part: impl Into<String>) -> Self {
        Self::BeforeSpeakingPart {
            text_part: text_part.into(),
        }
    }

    pub fn after_speaking_part(text_part: impl Into<String>) -> Self {
        Self::AfterSpeakingPart {
            text_part: text_part.into(),
        }
    }

    /// The kind listeners are registered under.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::BeforeSpeaking { .. } => EventKind::BeforeSpeaking,
            Self::BeforeSpeakingPart { .. } => EventKind::BeforeSpeakingPart,
            Self::AfterSpeakingPart { .. } => EventKind::AfterSpeakingPart,
            Self::AfterSpeaking => EventKind::AfterSpeaking,
            Self::StopSpeaking => EventKind::StopSpeaking,
        }
    }

    /// Character count of the text or segment carried by the event.
    ///
    /// Zero for events without a text payload.
    pub fn text_length(&self) -> usize {
        match self {
            Self::BeforeSpeaking { text } => text.chars().count(),
            Self::BeforeSpeakingPart { text_part } | Self::AfterSpeakingPart { text_part } => {
                text_part.chars().count()
            }
            Self::AfterSpeaking | Self::StopSpeaking => 0,
        }
    }
}
