//! Topshelf CLI - shelf command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use topshelf_cli::{cmd, config::Config};

/// Topshelf - your freshest documents, one shelf away
#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file (default: ~/.config/topshelf/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track the watched folders live, reprinting the shelf on change
    Watch,
    /// Scan once and print the current shelf
    List {
        /// Emit JSON instead of the rendered list
        #[arg(long)]
        json: bool,
    },
    /// Show the watched roots and their timestamp policies
    Roots,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let max_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Watch => cmd::watch::run(&config).await,
        Commands::List { json } => cmd::list::run(&config, json).await,
        Commands::Roots => cmd::roots::run(&config),
    }
}
