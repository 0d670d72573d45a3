//! Side effects driven by speech lifecycle events.
//!
//! Each observer is a small manager over one host port. Wiring them to the
//! [`Broadcaster`](crate::broadcaster::Broadcaster) happens in
//! [`bootstrap`](crate::bootstrap).

mod icon;
mod popup;
mod progress;
mod suspension;

pub use icon::IconManager;
pub use popup::ButtonPopupManager;
pub use progress::{ProgressSnapshot, TalkieProgress};
pub use suspension::SuspensionManager;
