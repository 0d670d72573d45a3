//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the orchestration layer expects from the host
//! browser and the speech engine. They contain no implementation details and
//! use only domain types.
//!
//! # Design Rules
//!
//! - Ports are `Send + Sync` so they can be shared as `Arc<dyn Port>`
//! - Async ports use `async_trait` for dyn compatibility
//! - Observers' ports return `PortError`; the observer logs, never panics

pub mod action_button;
pub mod context_menu;
pub mod language;
pub mod locale;
pub mod speech_engine;
pub mod suspension;
pub mod tab_host;
pub mod url_opener;

use thiserror::Error;

pub use action_button::{ActionButton, IconMode};
pub use context_menu::{ContextMenuHost, ContextMenuItem, MenuContext};
pub use language::{LanguageDetector, NoopLanguageDetector};
pub use locale::{LocaleProvider, NOT_ABLE_TO_SPEAK_KEY, StaticLocale};
pub use speech_engine::{EngineError, SpeechEngine};
pub use suspension::SuspensionControl;
pub use tab_host::{TabHost, TabHostError};
pub use url_opener::UrlOpener;

/// Error returned by side-effect-only host ports (button, menus, tabs).
#[derive(Debug, Error)]
pub enum PortError {
    /// The host API is not available in this context.
    #[error("Host API unavailable: {0}")]
    Unavailable(String),

    /// The host API call was made but failed.
    #[error("Host API call failed: {0}")]
    Failed(String),
}
