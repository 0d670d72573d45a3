//! Background error types.
//!
//! Cancellation is deliberately absent: a superseded operation returns `Ok`.

use talkie_core::{EngineError, TabHostError};

use crate::commands::CommandName;

/// Errors that can occur while speaking.
#[derive(Debug, thiserror::Error)]
pub enum SpeakerError {
    /// The speech engine failed to speak or stop.
    #[error("Speech engine failed: {0}")]
    Engine(#[from] EngineError),

    /// The active tab could not be read.
    #[error("Could not read from the active tab: {0}")]
    TabHost(#[from] TabHostError),
}

/// Errors returned by orchestrator operations.
#[derive(Debug, thiserror::Error)]
pub enum BackgroundError {
    #[error(transparent)]
    Speaker(#[from] SpeakerError),
}

/// Errors returned by command dispatch.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// No command with this name exists.
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// The command exists but no action was registered for it.
    #[error("No action registered for command '{0}'")]
    Unmapped(CommandName),

    /// The command needs a text argument and none was given.
    #[error("Command '{0}' requires a text argument")]
    MissingArgument(CommandName),

    /// The command's action failed.
    #[error("Command '{command}' failed: {source}")]
    Failed {
        command: CommandName,
        source: anyhow::Error,
    },
}
