use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use talkie_core::{PortError, SuspensionControl};
use tracing::debug;

/// Keeps the background alive while speaking.
///
/// Repeated calls in the same direction are no-ops.
pub struct SuspensionManager {
    control: Arc<dyn SuspensionControl>,
    prevented: AtomicBool,
}

impl SuspensionManager {
    pub fn new(control: Arc<dyn SuspensionControl>) -> Self {
        Self {
            control,
            prevented: AtomicBool::new(false),
        }
    }

    pub async fn prevent_extension_suspend(&self) -> Result<(), PortError> {
        if self.prevented.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Err(error) = self.control.prevent_suspend().await {
            self.prevented.store(false, Ordering::SeqCst);
            return Err(error);
        }
        debug!("Preventing suspension");
        Ok(())
    }

    pub async fn allow_extension_suspend(&self) -> Result<(), PortError> {
        if !self.prevented.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        if let Err(error) = self.control.allow_suspend().await {
            self.prevented.store(true, Ordering::SeqCst);
            return Err(error);
        }
        debug!("Allowing suspension");
        Ok(())
    }

    pub fn is_suspension_prevented(&self) -> bool {
        self.prevented.load(Ordering::SeqCst)
    }
}
