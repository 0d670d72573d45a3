//! Interactive session: one command per line on stdin.
//!
//! The session plays the part of the browser, forwarding shortcuts, clicks
//! and tab events to the background.

use std::sync::Arc;

use talkie_background::{ContextMenuClick, TalkieApp};
use talkie_core::{TabChangeInfo, TextSelection, VoiceDescriptor};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};

use crate::adapters::SessionTab;

pub const HELP: &str = "\
Commands:
  toggle                   start or stop speaking the selection (action button)
  command <name>           run a keyboard shortcut command, e.g. start-stop
  menu <id> [text]         click a context menu item, optionally with selected text
  select [lang:]<text>     replace the page selection
  also [lang:]<text>       add another selected range
  clear                    clear the selection
  page-lang <lang>|none    set the page's language
  say <text>               speak text, detecting its language
  voice <name> <lang> <text>
                           speak text in a given voice
  stop                     stop speaking
  voices                   list voices
  goto <url>               navigate the tab
  close                    close the tab
  open <url>               open a new tab
  suspend                  suspend the background
  progress                 show speaking progress
  wait                     wait until queued speech is done
  help                     show this help
  quit                     exit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplError {
    #[error("Unknown command '{0}', type 'help'")]
    UnknownCommand(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Toggle,
    Command(String),
    Menu { id: String, text: Option<String> },
    Select(TextSelection),
    AddSelection(TextSelection),
    ClearSelection,
    PageLanguage(Option<String>),
    Say(String),
    SayInVoice { voice: VoiceDescriptor, text: String },
    Stop,
    Voices,
    Goto(String),
    Close,
    Open(String),
    Suspend,
    Progress,
    Wait,
    Help,
    Quit,
    Empty,
}

/// Parse one input line.
pub fn parse_line(line: &str) -> Result<ReplCommand, ReplError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));
    let argument = |name: &'static str| {
        if rest.is_empty() {
            Err(ReplError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };

    Ok(match word {
        "" => ReplCommand::Empty,
        "toggle" => ReplCommand::Toggle,
        "command" => ReplCommand::Command(argument("command")?),
        "menu" => {
            let id = argument("menu")?;
            match id.split_once(char::is_whitespace) {
                Some((id, text)) => ReplCommand::Menu {
                    id: id.to_string(),
                    text: Some(text.trim().to_string()),
                },
                None => ReplCommand::Menu { id, text: None },
            }
        }
        "select" => ReplCommand::Select(selection(&argument("select")?)),
        "also" => ReplCommand::AddSelection(selection(&argument("also")?)),
        "clear" => ReplCommand::ClearSelection,
        "page-lang" => {
            let language = argument("page-lang")?;
            ReplCommand::PageLanguage((language != "none").then_some(language))
        }
        "say" => ReplCommand::Say(argument("say")?),
        "voice" => {
            let rest = argument("voice")?;
            let mut parts = rest.splitn(3, char::is_whitespace);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(lang), Some(text)) if !text.trim().is_empty() => {
                    ReplCommand::SayInVoice {
                        voice: VoiceDescriptor::named(name, lang),
                        text: text.trim().to_string(),
                    }
                }
                _ => return Err(ReplError::MissingArgument("voice")),
            }
        }
        "stop" => ReplCommand::Stop,
        "voices" => ReplCommand::Voices,
        "goto" => ReplCommand::Goto(argument("goto")?),
        "close" => ReplCommand::Close,
        "open" => ReplCommand::Open(argument("open")?),
        "suspend" => ReplCommand::Suspend,
        "progress" => ReplCommand::Progress,
        "wait" => ReplCommand::Wait,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(ReplError::UnknownCommand(other.to_string())),
    })
}

/// `lang:text` selects text marked up with a language; plain text has none.
fn selection(argument: &str) -> TextSelection {
    match argument.split_once(':') {
        Some((lang, text)) if is_language_tag(lang) => {
            TextSelection::new(text.trim()).with_html_tag_language(lang)
        }
        _ => TextSelection::new(argument),
    }
}

/// `fr`, `en-US`, `zh-Hant`: a lowercase primary subtag and short subtags.
fn is_language_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let primary_ok = subtags.next().is_some_and(|primary| {
        (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_lowercase())
    });
    primary_ok
        && subtags.all(|subtag| {
            (2..=4).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Run one command. Returns `false` when the session should end.
pub async fn execute(app: &TalkieApp, tab: &Arc<SessionTab>, command: ReplCommand) -> bool {
    let outcome: anyhow::Result<()> = match command {
        ReplCommand::Empty => Ok(()),
        ReplCommand::Toggle => app.icon_click().await.map_err(Into::into),
        ReplCommand::Command(name) => app.on_command(&name).await.map_err(Into::into),
        ReplCommand::Menu { id, text } => {
            let click = ContextMenuClick {
                menu_item_id: id,
                selection_text: text,
            };
            app.on_context_menu_click(&click).await.map_err(Into::into)
        }
        ReplCommand::Select(selection) => {
            tab.select(selection);
            Ok(())
        }
        ReplCommand::AddSelection(selection) => {
            tab.add_selection(selection);
            Ok(())
        }
        ReplCommand::ClearSelection => {
            tab.clear_selection();
            Ok(())
        }
        ReplCommand::PageLanguage(language) => {
            tab.set_page_language(language);
            Ok(())
        }
        ReplCommand::Say(text) => app
            .command_handler()
            .handle("start-text", Some(text))
            .await
            .map_err(Into::into),
        ReplCommand::SayInVoice { voice, text } => app
            .start_speak_from_frontend(text, voice)
            .await
            .map_err(Into::into),
        ReplCommand::Stop => app.stop_speak_from_frontend().await.map_err(Into::into),
        ReplCommand::Voices => print_voices(app).await,
        ReplCommand::Goto(url) => {
            tab.navigate(url.clone());
            match tab.tab_id() {
                Some(tab_id) => app
                    .on_tab_updated(tab_id, &TabChangeInfo::navigated_to(url))
                    .await
                    .map_err(Into::into),
                None => Ok(()),
            }
        }
        ReplCommand::Close => match tab.close() {
            Some(tab_id) => app.on_tab_removed(tab_id).await.map_err(Into::into),
            None => Ok(()),
        },
        ReplCommand::Open(url) => {
            let tab_id = tab.open(url);
            println!("Opened tab {tab_id}");
            Ok(())
        }
        ReplCommand::Suspend => app.on_suspend().await.map_err(Into::into),
        ReplCommand::Progress => {
            let progress = app.progress();
            println!(
                "{}/{} characters ({:.0}%)",
                progress.current,
                progress.max,
                progress.fraction() * 100.0
            );
            Ok(())
        }
        ReplCommand::Wait => {
            app.idle().await;
            Ok(())
        }
        ReplCommand::Help => {
            println!("{HELP}");
            Ok(())
        }
        ReplCommand::Quit => return false,
    };

    if let Err(error) = outcome {
        error!(error = %error, "Command failed");
        eprintln!("Error: {error}");
    }
    true
}

async fn print_voices(app: &TalkieApp) -> anyhow::Result<()> {
    for voice in app.get_all_voices_from_frontend().await? {
        let marker = if voice.default { " (default)" } else { "" };
        println!("{:<12} {}{marker}", voice.name, voice.lang);
    }
    Ok(())
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(app: &TalkieApp, tab: &Arc<SessionTab>) -> anyhow::Result<()> {
    println!("Talkie ready. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(command) => {
                if !execute(app, tab, command).await {
                    break;
                }
            }
            Err(error) => {
                warn!(input = %line, "Unparsable input");
                eprintln!("{error}");
            }
        }
    }

    app.stop_speak_from_frontend().await?;
    app.idle().await;
    Ok(())
}
