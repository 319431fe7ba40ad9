//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod health;
pub mod say;
pub mod settings;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::health::run_health;
use crate::cli::say::run_say;
use crate::cli::settings::{apply_set, apply_unset};
use crate::core::config::Config;
use crate::core::transport::HttpTransport;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::TranscriptLog;
use crate::utils::tracing_setup;

#[derive(Parser)]
#[command(name = "parley", version)]
#[command(about = "A terminal client for a remote chat service")]
#[command(
    long_about = "Parley exchanges single-turn messages with a chat service over HTTP \
(POST <base-url>/chat) and keeps the conversation transcript for the session.\n\n\
Base URL resolution (first match wins):\n\
  --base-url        Command-line flag\n\
  PARLEY_BASE_URL   Environment variable\n\
  base-url          Config file value (see 'parley set')\n\
  default           http://localhost:8000\n\n\
Diagnostics:\n\
  RUST_LOG          Overrides the configured log-level (written to stderr)\n\n\
Commands inside the chat:\n\
  /help             Show available commands\n\
  /clear            Empty the transcript\n\
  /dismiss          Dismiss the last error\n\
  /dump [file]      Export the conversation as JSON\n\
  /quit             Leave the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the chat service
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Append the transcript to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message to send (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Query the chat service's health endpoint
    Health,
    /// Set configuration values
    Set {
        /// Configuration key to set (base-url, log-level)
        key: Option<String>,
        /// Value to set for the key
        value: Option<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load()?;

    tracing_setup::init(config.log_level.as_deref())?;

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            let (Some(key), Some(value)) = (key, value) else {
                config.print_all();
                return Ok(());
            };
            let mut config = config;
            match apply_set(&mut config, &key, &value) {
                Ok(message) => {
                    config.save()?;
                    println!("✅ {message}");
                }
                Err(err) => {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = config;
            match apply_unset(&mut config, &key) {
                Ok(message) => {
                    config.save()?;
                    println!("✅ {message}");
                }
                Err(err) => {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        command => {
            let base_url = config.resolve_base_url(args.base_url.as_deref());
            debug!(base_url = %base_url, "Resolved chat service base URL");
            let transport = HttpTransport::new(&base_url);
            let log = match args.log {
                Some(path) => Some(TranscriptLog::create(&path).map_err(|err| {
                    format!("Failed to open log file {path}: {err}")
                })?),
                None => None,
            };

            match command {
                Commands::Health => run_health(&transport).await,
                Commands::Say { prompt } => run_say(transport, prompt, log).await,
                _ => run_chat(transport, log).await,
            }
        }
    }
}
