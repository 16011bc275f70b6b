#![forbid(unsafe_code)]

//! `godeeper-ctl` — support CLI for the deep-link and focus-prompt cores.
//!
//! Runs both engines against the local `SQLite` store so support staff can
//! inspect a pending link, replay a URL, or reset focus-mode preferences.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use godeeper_core::cadence::PromptCadenceEngine;
use godeeper_core::links::{parse_link, LinkResolver};
use godeeper_core::router::RecordingRouter;
use godeeper_core::store::SqliteStore;
use godeeper_core::{AppError, GlobalConfig, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "godeeper-ctl",
    about = "Support CLI for deep-link routing and focus-prompt cadence",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the `SQLite` store location from the config.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the thread id carried by a URL.
    Parse {
        /// URL to inspect.
        url: String,
    },

    /// Resolve a URL as if it had just been opened.
    Open {
        /// URL to resolve.
        url: String,
        /// Treat the user as signed in.
        #[arg(long)]
        authenticated: bool,
    },

    /// Resume the pending link, as happens right after sign-in.
    Flush,

    /// Drop the pending link without navigating.
    ClearPending,

    /// Inspect or change focus-mode prompt preferences.
    Prompt {
        #[command(subcommand)]
        action: PromptAction,
    },
}

#[derive(Debug, Subcommand)]
enum PromptAction {
    /// Show stored preferences and this session's decision.
    Status,
    /// Record that the prompt was shown.
    Shown,
    /// Permanently opt out.
    Dismiss,
    /// Delete stored preferences.
    Reset,
}

#[derive(Debug, Serialize)]
struct OpenReport<'a> {
    #[serde(flatten)]
    resolution: godeeper_core::models::link::LinkResolution,
    navigation: &'a [godeeper_core::router::NavigationEvent],
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    if let Some(db) = args.db {
        config.db_path = db;
    }

    if let Command::Parse { url } = &args.command {
        match parse_link(url) {
            Some(thread_id) => println!("{thread_id}"),
            None => println!("no match"),
        }
        return Ok(());
    }

    let store = Arc::new(SqliteStore::connect(&config.db_path).await?);
    info!(db = %config.db_path.display(), "store opened");

    let router = Arc::new(RecordingRouter::new());
    let resolver = LinkResolver::new(store.clone(), router.clone(), config.links.clone());

    match args.command {
        Command::Parse { .. } => {}
        Command::Open { url, authenticated } => {
            let resolution = resolver.resolve_incoming_link(&url, authenticated).await;
            let navigation = router.take_events();
            print_json(&OpenReport {
                resolution,
                navigation: &navigation,
            })?;
        }
        Command::Flush => {
            let consumed = resolver.flush_pending_link_if_any().await;
            let navigation = router.take_events();
            print_json(&serde_json::json!({
                "consumed": consumed,
                "navigation": navigation,
            }))?;
        }
        Command::ClearPending => {
            resolver.clear_pending_link().await;
            println!("OK");
        }
        Command::Prompt { action } => {
            let mut engine = PromptCadenceEngine::new(store, &config.cadence);
            let snapshot = match action {
                PromptAction::Status => engine.load().await,
                PromptAction::Shown => {
                    engine.mark_prompt_shown().await;
                    engine.snapshot()
                }
                PromptAction::Dismiss => {
                    engine.set_dont_show_again().await;
                    engine.snapshot()
                }
                PromptAction::Reset => {
                    engine.reset_preferences().await;
                    engine.snapshot()
                }
            };
            print_json(&snapshot)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
