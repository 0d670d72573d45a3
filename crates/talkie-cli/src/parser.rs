//! Command-line parser and top-level argument handling.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal host for the Talkie background.
///
/// Speech is simulated on the console; the "active tab" is an in-memory page
/// whose selection and URL can be changed from the interactive session.
#[derive(Parser)]
#[command(name = "talkie")]
#[command(about = "Speak text selections, one sentence at a time")]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to settings.json in the config directory)
    #[arg(long = "settings", env = "TALKIE_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Log filter, e.g. `info` or `talkie_background=debug`
    #[arg(long = "log-level", env = "TALKIE_LOG", global = true)]
    pub log_level: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Speaking rate of the simulated voice, in characters per second
    #[arg(long = "rate", default_value_t = 40, global = true)]
    pub chars_per_second: u32,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Speak a text and exit
    Say {
        /// Text to speak
        text: String,

        /// Voice name to use
        #[arg(long)]
        voice: Option<String>,

        /// Language to speak in; detected from markup or defaults otherwise
        #[arg(long)]
        lang: Option<String>,
    },

    /// List the available voices
    Voices {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session reading commands from stdin (the default)
    Repl,
}

impl Cli {
    /// Log filter directive from the flags.
    pub fn log_filter(&self) -> String {
        match (&self.log_level, self.verbose) {
            (Some(level), _) => level.clone(),
            (None, true) => "debug".to_string(),
            (None, false) => "info".to_string(),
        }
    }
}
