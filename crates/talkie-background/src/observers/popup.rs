use std::sync::Arc;

use talkie_core::{ActionButton, PortError};
use tracing::debug;

/// Enables the action button popup while idle and disables it while
/// speaking, so a click toggles speech instead of opening the popup.
pub struct ButtonPopupManager {
    button: Arc<dyn ActionButton>,
}

impl ButtonPopupManager {
    pub fn new(button: Arc<dyn ActionButton>) -> Self {
        Self { button }
    }

    pub async fn enable_popup(&self) -> Result<(), PortError> {
        self.button.enable_popup().await?;
        debug!("Popup enabled");
        Ok(())
    }

    pub async fn disable_popup(&self) -> Result<(), PortError> {
        self.button.disable_popup().await?;
        debug!("Popup disabled");
        Ok(())
    }
}
