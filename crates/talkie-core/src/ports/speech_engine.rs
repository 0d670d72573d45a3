//! Speech engine port.
//!
//! The engine is the only component that produces audio. It is consumed
//! exclusively by the speaker.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Voice, VoiceDescriptor};

/// Errors reported by the speech engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected or failed an utterance.
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// The engine could not stop ongoing audio.
    #[error("Failed to stop speech: {0}")]
    Stop(String),

    /// The installed voice list could not be read.
    #[error("Voice list unavailable: {0}")]
    Voices(String),

    /// The engine is not available at all.
    #[error("Speech engine unavailable")]
    Unavailable,
}

/// Port for the text-to-speech engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Speak one utterance.
    ///
    /// Resolves when the utterance has ended, either because it finished or
    /// because [`stop`](SpeechEngine::stop) interrupted it.
    async fn speak(&self, text: &str, voice: &VoiceDescriptor) -> Result<(), EngineError>;

    /// Immediately end all ongoing and queued audio.
    async fn stop(&self) -> Result<(), EngineError>;

    /// The voices installed in the engine.
    async fn list_voices(&self) -> Result<Vec<Voice>, EngineError>;
}
