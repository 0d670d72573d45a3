//! Browser-action button port (icon and popup).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PortError;

/// Icon shown on the browser-action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconMode {
    Playing,
    Stopped,
}

/// Port for the browser-action button.
#[async_trait]
pub trait ActionButton: Send + Sync {
    async fn set_icon_mode(&self, mode: IconMode) -> Result<(), PortError>;

    /// Show the popup when the button is clicked.
    async fn enable_popup(&self) -> Result<(), PortError>;

    /// Deliver button clicks to the background instead of opening the popup.
    async fn disable_popup(&self) -> Result<(), PortError>;
}
