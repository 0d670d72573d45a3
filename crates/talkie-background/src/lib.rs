//! Speech session orchestration for the Talkie background.
//!
//! The [`Speaker`] drives a [`SpeechEngine`](talkie_core::SpeechEngine) and
//! publishes lifecycle events on the [`Broadcaster`]. The [`Background`]
//! serializes user actions through a [`Chain`] and cancels superseded ones.
//! [`bootstrap::build`] wires everything over the host's ports.

#![deny(unsafe_code)]

pub mod background;
pub mod bootstrap;
pub mod broadcaster;
pub mod chain;
pub mod commands;
pub mod error;
mod language;
pub mod observers;
pub mod only_last_caller;
pub mod speaker;
pub mod speaking_status;

// Re-export the orchestration entry points
pub use background::Background;
pub use bootstrap::{Ports, TalkieApp, build};
pub use broadcaster::Broadcaster;
pub use chain::Chain;
pub use commands::{
    CommandHandler, CommandMap, CommandName, ContextMenuClick, ContextMenuManager,
    ShortcutKeyManager,
};
pub use error::{BackgroundError, CommandError, SpeakerError};
pub use observers::{
    ButtonPopupManager, IconManager, ProgressSnapshot, SuspensionManager, TalkieProgress,
};
pub use only_last_caller::{Generation, OnlyLastCaller};
pub use speaker::{Speaker, SpeakerConfig, SpeakerState};
pub use speaking_status::SpeakingStatus;
