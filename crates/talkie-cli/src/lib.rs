//! Terminal host for the Talkie background.
//!
//! Provides console implementations of the host ports and an interactive
//! session that stands in for the browser.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use serde_json as _;
use tracing_subscriber as _;

pub mod adapters;
pub mod config;
pub mod parser;
pub mod repl;

use std::sync::Arc;

use talkie_background::{Ports, TalkieApp, build};
use talkie_core::{NoopLanguageDetector, Settings, StaticLocale};

pub use config::load_settings;
pub use parser::{Cli, Commands};

use adapters::{ConsoleEngine, ConsoleHost, SessionTab};

/// Build the background over console ports.
///
/// Must be called from within a Tokio runtime.
pub fn bootstrap(settings: &Settings, chars_per_second: u32) -> (TalkieApp, Arc<SessionTab>) {
    let tab = Arc::new(SessionTab::new());
    let host = Arc::new(ConsoleHost);

    let app = build(
        settings,
        Ports {
            engine: Arc::new(ConsoleEngine::new(chars_per_second)),
            tab_host: tab.clone(),
            language_detector: Arc::new(NoopLanguageDetector),
            action_button: host.clone(),
            suspension: host.clone(),
            url_opener: host.clone(),
            context_menu_host: host,
            locale: Arc::new(StaticLocale::from_settings(settings)),
        },
    );

    (app, tab)
}
