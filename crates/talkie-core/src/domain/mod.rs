//! Domain types shared by the orchestration layer and its adapters.
//!
//! These are pure data types with no infrastructure dependencies.

mod selection;
mod tab;
mod voice;

pub use selection::TextSelection;
pub use tab::{TabChangeInfo, TabId, TabLoadStatus};
pub use voice::{Voice, VoiceDescriptor, language_group};
