/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`:     Interactive question/answer session
- `ask`:      One question, one answer
- `snapshot`: Print the live data snapshot

Each handler builds its components from the validated configuration and
hands control to the session host.
*/

use crate::config::Config;
use crate::error::Result;
use crate::session::SessionHost;

// Interactive chat handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Builds the session host and runs it against a `rustyline` editor on
    //! a terminal, or against plain buffered stdin when input is piped.

    use super::*;
    use crate::context_mode::{ContextMode, LIVE_DATA_TOOL};
    use crate::session::{BufReadInput, ReadlineInput};
    use std::io::IsTerminal;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    pub async fn run_chat(config: &Config) -> Result<()> {
        let host = SessionHost::from_config(config)?;
        tracing::info!(mode = %host.mode(), "Starting interactive chat mode");

        print_welcome_banner(host.mode());

        let mut stdout = std::io::stdout();
        let stats = if std::io::stdin().is_terminal() {
            let mut input = ReadlineInput::new()?;
            host.run(&mut input, &mut stdout).await?
        } else {
            tracing::debug!("stdin is not a terminal, reading questions line by line");
            let mut input = BufReadInput::new(std::io::stdin().lock());
            host.run(&mut input, &mut stdout).await?
        };

        tracing::debug!(turns = stats.turns, failures = stats.failures, "Chat finished");
        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome_banner(mode: ContextMode) {
        use colored::Colorize;

        match mode {
            ContextMode::Direct => {
                println!("\n🔥 {}", "Live API Chat".bold());
            }
            ContextMode::ToolConstrained => {
                println!("\n🔥 {}", "MCP Live API Chatbot".bold());
                println!("🔌 Tool: {}", LIVE_DATA_TOOL.cyan());
            }
        }
        println!("Mode: {} ({})", mode.colored_tag(), mode.description());
        println!("Type 'exit' or 'quit' to leave.\n");
    }
}

// One-shot question handler
pub mod ask {
    //! Answer a single question and exit.

    use super::*;
    use crate::prompts::Question;

    /// Ask one question against the live data
    ///
    /// # Errors
    ///
    /// Unlike the interactive loop, any failure is returned to the caller
    /// so the process exits with a non-zero status.
    pub async fn run_ask(config: &Config, question: &str) -> Result<()> {
        let host = SessionHost::from_config(config)?;
        tracing::info!(mode = %host.mode(), "Answering one question");

        let answer = host.ask(&Question::new(question.trim())).await?;
        println!("{}", answer);
        Ok(())
    }
}

// Snapshot inspection handler
pub mod snapshot {
    //! Print the normalized snapshot the model would receive.

    use super::*;
    use crate::snapshot::{HttpSnapshotProvider, SnapshotProvider};

    /// Fetch the configured data source once and print the snapshot
    pub async fn run_snapshot(config: &Config) -> Result<()> {
        let provider = HttpSnapshotProvider::new(&config.source)?;
        tracing::info!(url = %provider.url(), "Fetching snapshot");

        let snapshot = provider.fetch().await?;
        println!("{}", snapshot);
        Ok(())
    }
}
