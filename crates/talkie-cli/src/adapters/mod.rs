//! Terminal implementations of the host ports.

mod console_engine;
mod console_host;
mod session_tab;

pub use console_engine::ConsoleEngine;
pub use console_host::ConsoleHost;
pub use session_tab::{PageKind, SessionTab};
