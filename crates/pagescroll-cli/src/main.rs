use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagescroll_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "pagescroll")]
#[command(author, version, about = "A terminal list that prefetches pages as you scroll")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Total number of demo items
    #[arg(long)]
    total_items: Option<u32>,

    /// Items per page
    #[arg(long)]
    items_per_page: Option<u32>,

    /// Simulated fetch latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Page to open first
    #[arg(long)]
    start_page: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Write the default configuration if none exists
    Init,
}

/// Log to a file in the data directory; the terminal belongs to the UI
fn init_logging(config: &AppConfig) -> Result<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration, then apply command-line overrides
    let mut config = AppConfig::load()?;
    if let Some(total_items) = cli.total_items {
        config.source.total_items = total_items;
    }
    if let Some(items_per_page) = cli.items_per_page {
        config.source.items_per_page = items_per_page;
    }
    if let Some(latency_ms) = cli.latency_ms {
        config.source.latency_ms = latency_ms;
    }
    if let Some(start_page) = cli.start_page {
        config.source.start_page = start_page;
    }

    match cli.command {
        Some(Commands::Run) | None => {
            init_logging(&config)?;
            commands::run::run(Arc::new(config)).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Init => commands::config::init(),
        },
    }
}
