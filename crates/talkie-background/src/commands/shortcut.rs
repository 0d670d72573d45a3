use std::sync::Arc;

use tracing::{error, info};

use super::CommandHandler;
use crate::error::CommandError;

/// Routes keyboard shortcut commands to the command handler.
pub struct ShortcutKeyManager {
    command_handler: Arc<CommandHandler>,
}

impl ShortcutKeyManager {
    pub fn new(command_handler: Arc<CommandHandler>) -> Self {
        Self { command_handler }
    }

    pub async fn handler(&self, command: &str) -> Result<(), CommandError> {
        info!(command, "Shortcut received");

        match self.command_handler.handle(command, None).await {
            Ok(()) => {
                info!(command, "Shortcut done");
                Ok(())
            }
            Err(error) => {
                error!(command, error = %error, "Shortcut failed");
                Err(error)
            }
        }
    }
}
