use std::sync::Arc;

use serde::{Deserialize, Serialize};
use talkie_core::{ContextMenuHost, ContextMenuItem, LocaleProvider, MenuContext, PortError};
use tracing::{debug, info, warn};

use super::{CommandHandler, CommandName};
use crate::error::CommandError;

/// A click on one of the extension's context menu items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuClick {
    pub menu_item_id: String,
    #[serde(default)]
    pub selection_text: Option<String>,
}

impl ContextMenuClick {
    pub fn new(menu_item_id: impl Into<String>) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            selection_text: None,
        }
    }

    #[must_use]
    pub fn with_selection_text(mut self, text: impl Into<String>) -> Self {
        self.selection_text = Some(text.into());
        self
    }
}

struct MenuEntry {
    command: CommandName,
    title_key: &'static str,
    default_title: &'static str,
    contexts: &'static [MenuContext],
}

const MENU: [MenuEntry; 4] = [
    MenuEntry {
        command: CommandName::StartStop,
        title_key: "contextMenuSpeakSelection",
        default_title: "Speak selection",
        contexts: &[MenuContext::Selection],
    },
    MenuEntry {
        command: CommandName::OpenWebsiteMain,
        title_key: "contextMenuOpenWebsiteMain",
        default_title: "Talkie website",
        contexts: &[MenuContext::BrowserAction],
    },
    MenuEntry {
        command: CommandName::OpenWebsiteChromeWebStore,
        title_key: "contextMenuOpenWebsiteChromeWebStore",
        default_title: "Rate Talkie",
        contexts: &[MenuContext::BrowserAction],
    },
    MenuEntry {
        command: CommandName::OpenWebsiteDonate,
        title_key: "contextMenuOpenWebsiteDonate",
        default_title: "Donate",
        contexts: &[MenuContext::BrowserAction],
    },
];

/// Creates the extension's context menu and routes clicks to commands.
pub struct ContextMenuManager {
    command_handler: Arc<CommandHandler>,
    menu_host: Arc<dyn ContextMenuHost>,
    locale: Arc<dyn LocaleProvider>,
}

impl ContextMenuManager {
    pub fn new(
        command_handler: Arc<CommandHandler>,
        menu_host: Arc<dyn ContextMenuHost>,
        locale: Arc<dyn LocaleProvider>,
    ) -> Self {
        Self {
            command_handler,
            menu_host,
            locale,
        }
    }

    /// Menu items with localized titles. The item id is the command name.
    pub fn items(&self) -> Vec<ContextMenuItem> {
        MENU.iter()
            .map(|entry| ContextMenuItem {
                id: entry.command.as_str().to_string(),
                title: self
                    .locale
                    .message(entry.title_key)
                    .unwrap_or_else(|| entry.default_title.to_string()),
                contexts: entry.contexts.to_vec(),
            })
            .collect()
    }

    /// Register every menu item with the host. Stops at the first failure.
    pub async fn create_context_menus(&self) -> Result<(), PortError> {
        for item in self.items() {
            self.menu_host.create_item(&item).await.map_err(|error| {
                warn!(item = %item.id, error = %error, "Could not create context menu item");
                error
            })?;
            debug!(item = %item.id, "Created context menu item");
        }
        info!("Context menus created");
        Ok(())
    }

    /// Run the command behind a clicked item.
    ///
    /// Clicking the speak item with selected text speaks exactly that text;
    /// without selected text it toggles speaking the page selection.
    pub async fn context_menu_click_action(
        &self,
        click: &ContextMenuClick,
    ) -> Result<(), CommandError> {
        let command = MENU
            .iter()
            .map(|entry| entry.command)
            .find(|command| command.as_str() == click.menu_item_id)
            .ok_or_else(|| CommandError::Unknown(click.menu_item_id.clone()))?;

        info!(item = %click.menu_item_id, "Context menu clicked");

        let selection = click
            .selection_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());

        match (command, selection) {
            (CommandName::StartStop, Some(text)) => {
                self.command_handler
                    .handle_command(CommandName::StartText, Some(text.to_string()))
                    .await
            }
            (command, _) => self.command_handler.handle_command(command, None).await,
        }
    }
}
