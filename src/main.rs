//! APILens - ask questions about the live state of an HTTP API
//!
#![doc = "APILens - live API question answering CLI"]
#![doc = "Main entry point for the APILens application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use apilens::cli::{Cli, Commands};
use apilens::commands;
use apilens::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration; any problem here aborts before a session starts
    let config_path = cli.config.as_deref().unwrap_or("config/apilens.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match &cli.command {
        Commands::Chat { .. } => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(&config).await?;
        }
        Commands::Ask { question, .. } => {
            tracing::debug!("Using question: {}", question);
            commands::ask::run_ask(&config, question).await?;
        }
        Commands::Snapshot => {
            commands::snapshot::run_snapshot(&config).await?;
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with answers on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "apilens=debug" } else { "apilens=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
