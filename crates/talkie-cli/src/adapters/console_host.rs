//! Browser chrome stand-ins: action button, suspension, URLs and menus.
//!
//! These report what the browser would do through the log.

use async_trait::async_trait;
use talkie_core::{
    ActionButton, ContextMenuHost, ContextMenuItem, IconMode, PortError, SuspensionControl,
    UrlOpener,
};
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleHost;

#[async_trait]
impl ActionButton for ConsoleHost {
    async fn set_icon_mode(&self, mode: IconMode) -> Result<(), PortError> {
        info!(?mode, "Icon");
        Ok(())
    }

    async fn enable_popup(&self) -> Result<(), PortError> {
        info!("Popup enabled");
        Ok(())
    }

    async fn disable_popup(&self) -> Result<(), PortError> {
        info!("Popup disabled");
        Ok(())
    }
}

#[async_trait]
impl SuspensionControl for ConsoleHost {
    async fn prevent_suspend(&self) -> Result<(), PortError> {
        info!("Keeping background alive");
        Ok(())
    }

    async fn allow_suspend(&self) -> Result<(), PortError> {
        info!("Background may be suspended");
        Ok(())
    }
}

#[async_trait]
impl UrlOpener for ConsoleHost {
    async fn open_url_in_new_tab(&self, url: &str) -> Result<(), PortError> {
        println!("🌐 {url}");
        Ok(())
    }
}

#[async_trait]
impl ContextMenuHost for ConsoleHost {
    async fn create_item(&self, item: &ContextMenuItem) -> Result<(), PortError> {
        info!(id = %item.id, title = %item.title, contexts = ?item.contexts, "Context menu item");
        Ok(())
    }
}
