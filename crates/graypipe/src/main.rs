//! graypipe CLI - resize and grayscale a batch of images.
//!
//! # Usage
//!
//! ```bash
//! # Process files and directories with the staged concurrent pipeline
//! graypipe process images/
//!
//! # Same batch, one image at a time
//! graypipe process images/ --mode sequential
//!
//! # View configuration
//! graypipe config show
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// graypipe - batch resize-and-grayscale with sequential and staged concurrent modes.
#[derive(Parser, Debug)]
#[command(name = "graypipe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "GRAYPIPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resize and grayscale images
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A broken config file is fatal, but log through the default subscriber
    // so the error is still formatted consistently.
    let loaded = match &cli.config {
        Some(path) => graypipe_core::Config::load_from(path),
        None => graypipe_core::Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            let defaults = graypipe_core::Config::default();
            logging::init_from_config(&defaults, cli.verbose, cli.json_logs);
            tracing::error!("Failed to load config: {e}");
            return Err(e.into());
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("graypipe v{}", graypipe_core::VERSION);

    match cli.command {
        Commands::Process(args) => cli::process::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}
