//! Context menu port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PortError;

/// Where a context menu entry is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuContext {
    /// On selected page text.
    Selection,
    /// On the browser-action button.
    BrowserAction,
}

/// A context menu entry definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

/// Port for registering context menu entries with the browser.
#[async_trait]
pub trait ContextMenuHost: Send + Sync {
    async fn create_item(&self, item: &ContextMenuItem) -> Result<(), PortError>;
}
