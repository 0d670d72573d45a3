//! Core domain types, lifecycle events and port definitions for the Talkie
//! background.
//!
//! This crate has no runtime: it defines what the speech orchestration layer
//! talks about (voices, selections, tabs, events, settings) and the traits it
//! expects the host browser and the speech engine to implement.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod paths;
pub mod ports;
pub mod settings;
pub mod text;
pub mod voices;

// Re-export commonly used types for convenience
pub use domain::{
    TabChangeInfo, TabId, TabLoadStatus, TextSelection, Voice, VoiceDescriptor, language_group,
};
pub use events::{EventKind, SpeechEvent};
pub use paths::{PathError, config_root, settings_file_path};
pub use ports::{
    ActionButton, ContextMenuHost, ContextMenuItem, EngineError, IconMode, LanguageDetector,
    LocaleProvider, MenuContext, NOT_ABLE_TO_SPEAK_KEY, NoopLanguageDetector, PortError,
    SpeechEngine, StaticLocale, SuspensionControl, TabHost, TabHostError, UrlOpener,
};
pub use settings::{
    DEFAULT_ICON_UPDATE_DELAY_MS, DEFAULT_LANGUAGE, DEFAULT_MAX_SEGMENT_CHARS, Settings,
    SettingsError, WebsiteUrls, validate_settings,
};
pub use text::split_into_segments;

