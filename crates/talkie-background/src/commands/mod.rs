//! Named commands and their dispatch.
//!
//! The command map is built once at startup. Keyboard shortcuts, context
//! menu clicks and the CLI all dispatch through [`CommandHandler`].

mod context_menu;
mod shortcut;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::CommandError;

pub use context_menu::{ContextMenuClick, ContextMenuManager};
pub use shortcut::ShortcutKeyManager;

/// Every command the background understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    /// Toggle speaking the page selection.
    StartStop,
    /// Speak a given text, detecting its language.
    StartText,
    OpenWebsiteMain,
    OpenWebsiteChromeWebStore,
    OpenWebsiteDonate,
}

impl CommandName {
    pub const ALL: [Self; 5] = [
        Self::StartStop,
        Self::StartText,
        Self::OpenWebsiteMain,
        Self::OpenWebsiteChromeWebStore,
        Self::OpenWebsiteDonate,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartStop => "start-stop",
            Self::StartText => "start-text",
            Self::OpenWebsiteMain => "open-website-main",
            Self::OpenWebsiteChromeWebStore => "open-website-chromewebstore",
            Self::OpenWebsiteDonate => "open-website-donate",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CommandError::Unknown(s.to_string()))
    }
}

/// A command's action. Receives the optional text argument.
pub type CommandAction =
    Arc<dyn Fn(Option<String>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Builder for the command table.
#[derive(Default)]
pub struct CommandMap {
    actions: HashMap<CommandName, CommandAction>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the action for `name`, replacing any earlier one.
    #[must_use]
    pub fn with<F, Fut>(mut self, name: CommandName, action: F) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let action: CommandAction = Arc::new(move |argument| action(argument).boxed());
        self.actions.insert(name, action);
        self
    }
}

/// Dispatches commands by name.
pub struct CommandHandler {
    actions: HashMap<CommandName, CommandAction>,
}

impl CommandHandler {
    pub fn new(map: CommandMap) -> Self {
        Self {
            actions: map.actions,
        }
    }

    /// Parse `command` and run its action.
    pub async fn handle(
        &self,
        command: &str,
        argument: Option<String>,
    ) -> Result<(), CommandError> {
        let name = command.parse::<CommandName>().map_err(|error| {
            warn!(command, "Unknown command");
            error
        })?;
        self.handle_command(name, argument).await
    }

    pub async fn handle_command(
        &self,
        name: CommandName,
        argument: Option<String>,
    ) -> Result<(), CommandError> {
        let action = self
            .actions
            .get(&name)
            .ok_or(CommandError::Unmapped(name))?;

        debug!(command = %name, "Start");
        action(argument)
            .await
            .map_err(|source| CommandError::Failed {
                command: name,
                source,
            })?;
        debug!(command = %name, "Done");
        Ok(())
    }

    pub fn is_mapped(&self, name: CommandName) -> bool {
        self.actions.contains_key(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_handler() -> (CommandHandler, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let start_text_calls = calls.clone();
        let start_stop_calls = calls.clone();

        let map = CommandMap::new()
            .with(CommandName::StartStop, move |_| {
                let calls = start_stop_calls.clone();
                async move {
                    calls.lock().unwrap().push("toggle".to_string());
                    Ok(())
                }
            })
            .with(CommandName::StartText, move |argument| {
                let calls = start_text_calls.clone();
                async move {
                    let text = argument
                        .ok_or(CommandError::MissingArgument(CommandName::StartText))?;
                    calls.lock().unwrap().push(text);
                    Ok::<(), anyhow::Error>(())
                }
            })
            .with(CommandName::OpenWebsiteDonate, |_| async {
                Err(anyhow::anyhow!("no browser"))
            });

        (CommandHandler::new(map), calls)
    }

    #[test]
    fn test_command_names_round_trip() {
        for name in CommandName::ALL {
            assert_eq!(name.as_str().parse::<CommandName>().unwrap(), name);
        }
        assert!(matches!(
            "speak-louder".parse::<CommandName>(),
            Err(CommandError::Unknown(_))
        ));
    }

    #[tokio::test]
    async fn test_dispatches_with_argument() {
        let (handler, calls) = recording_handler();
        handler.handle("start-stop", None).await.unwrap();
        handler
            .handle("start-text", Some("Hello".to_string()))
            .await
            .unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["toggle", "Hello"]);
    }

    #[tokio::test]
    async fn test_unknown_and_unmapped_commands() {
        let (handler, _calls) = recording_handler();
        assert!(matches!(
            handler.handle("nope", None).await,
            Err(CommandError::Unknown(name)) if name == "nope"
        ));
        assert!(!handler.is_mapped(CommandName::OpenWebsiteMain));
        assert!(matches!(
            handler.handle("open-website-main", None).await,
            Err(CommandError::Unmapped(CommandName::OpenWebsiteMain))
        ));
    }

    #[tokio::test]
    async fn test_action_failures_are_wrapped() {
        let (handler, _calls) = recording_handler();

        let err = handler.handle("start-text", None).await.unwrap_err();
        assert!(matches!(
            err,
            CommandError::Failed {
                command: CommandName::StartText,
                ..
            }
        ));

        let err = handler.handle("open-website-donate", None).await.unwrap_err();
        assert!(err.to_string().contains("no browser"));
    }
}
