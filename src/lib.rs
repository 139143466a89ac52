//! APILens - live API question answering library
//!
//! This library answers natural-language questions about the current state
//! of a remote HTTP API. Every question triggers a fresh fetch of the API;
//! the normalized response is handed to a chat-completion model together
//! with an instruction to answer only from that data.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `snapshot`: tool provider role, fetches and normalizes the live data
//! - `prompts`: context packager, builds the two-message completion request
//! - `providers`: tool caller role, sends the request to the completion endpoint
//! - `session`: host role, the interactive loop with per-turn error isolation
//! - `context_mode`: direct and tool-constrained instruction modes
//! - `config`: configuration loading and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use apilens::{Config, Question, SessionHost};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/apilens.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let host = SessionHost::from_config(&config)?;
//!     let answer = host.ask(&Question::new("What is the status?")).await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod context_mode;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use config::Config;
pub use context_mode::ContextMode;
pub use error::{ApiLensError, Result, Service};
pub use prompts::{ContextPackager, Question};
pub use session::{SessionHost, SessionStats};
pub use snapshot::{Snapshot, SnapshotProvider};

#[cfg(test)]
pub mod test_utils;
