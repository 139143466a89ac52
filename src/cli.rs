//! Command-line interface definition for APILens
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! inspecting the live data snapshot.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// APILens - ask questions about the live state of an HTTP API
///
/// Every question triggers a fresh fetch of the configured API; the
/// response is handed to a completion model as the only context it may
/// answer from.
#[derive(Parser, Debug, Clone)]
#[command(name = "apilens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/apilens.yaml")]
    pub config: Option<String>,

    /// Path to a dotenv file (defaults to ./.env when present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for APILens
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive question/answer session
    Chat {
        /// Context mode: direct or tool (tool-constrained)
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Ask a single question and exit
    Ask {
        /// The question to answer from the live API data
        question: String,

        /// Context mode: direct or tool (tool-constrained)
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Fetch and print the current data snapshot without asking the model
    Snapshot,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Mode override supplied on the command line, if any
    pub fn mode_override(&self) -> Option<&str> {
        match &self.command {
            Commands::Chat { mode } | Commands::Ask { mode, .. } => mode.as_deref(),
            Commands::Snapshot => None,
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/apilens.yaml".to_string()),
            env_file: None,
            verbose: false,
            command: Commands::Chat { mode: None },
        }
    }
}
