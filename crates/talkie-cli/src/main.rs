//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use talkie_cli::{Cli, Commands, bootstrap, load_settings, repl};
use talkie_core::{TextSelection, VoiceDescriptor};

fn init_logging(cli: &Cli) {
    let env_filter =
        EnvFilter::try_new(cli.log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before parsing so `env` args see them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli);

    let settings = load_settings(cli.settings.as_deref())?;
    let (app, tab) = bootstrap(&settings, cli.chars_per_second);
    app.start().await?;
    app.on_installed().await?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Say { text, voice, lang } => {
            match (voice, lang) {
                (Some(name), lang) => {
                    let lang = lang.unwrap_or_else(|| settings.default_language.clone());
                    app.start_speak_from_frontend(text, VoiceDescriptor::named(name, lang))
                        .await?;
                }
                (None, Some(lang)) => {
                    tab.select(TextSelection::new(text).with_html_tag_language(lang));
                    app.icon_click().await?;
                }
                (None, None) => {
                    app.command_handler()
                        .handle("start-text", Some(text))
                        .await?;
                }
            }
            app.idle().await;
        }
        Commands::Voices { json } => {
            let voices = app.get_all_voices_from_frontend().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&voices)?);
            } else {
                for voice in voices {
                    println!("{:<12} {}", voice.name, voice.lang);
                }
            }
        }
        Commands::Repl => repl::run(&app, &tab).await?,
    }

    Ok(())
}
