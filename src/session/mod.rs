//! Session host: the read / fetch / package / complete / present loop
//!
//! The host drives one turn at a time through an explicit state machine:
//!
//! ```text
//! AwaitingInput -> FetchingSnapshot -> Packaging -> AwaitingCompletion -> Presenting -> AwaitingInput
//!       |                 |                                |
//!       v                 +------------- failure ----------+--> Presenting (error)
//!    Stopped
//! ```
//!
//! Any snapshot or completion failure ends only the current turn. Nothing
//! but the read-only configuration survives from one turn to the next.

pub mod input;

pub use input::{BufReadInput, LineReader, ReadlineInput};

use crate::config::Config;
use crate::context_mode::ContextMode;
use crate::error::{error_kind, Result};
use crate::prompts::{ContextPackager, Question};
use crate::providers::{create_completion_client, CompletionClient, CompletionRequest};
use crate::snapshot::{HttpSnapshotProvider, Snapshot, SnapshotProvider};
use std::io::Write;
use tracing::Instrument;

/// Width of the separator printed after each answer
pub const SEPARATOR_WIDTH: usize = 60;

/// Returns true if `line` asks to end the session (`exit` or `quit`, any case)
///
/// # Examples
///
/// ```
/// use apilens::session::is_exit_keyword;
///
/// assert!(is_exit_keyword("  QUIT "));
/// assert!(!is_exit_keyword("exit now"));
/// ```
pub fn is_exit_keyword(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Result of one turn, shown to the user in the `Presenting` state
#[derive(Debug)]
pub enum TurnOutcome {
    /// The model's answer, verbatim
    Answered(String),
    /// Why the turn could not produce an answer
    Failed(anyhow::Error),
}

/// States of the session state machine
#[derive(Debug)]
pub enum SessionState {
    /// Waiting for the next line of input
    AwaitingInput,
    /// Asking the snapshot provider for fresh data
    FetchingSnapshot {
        /// Question for this turn
        question: Question,
    },
    /// Building the completion request
    Packaging {
        /// Question for this turn
        question: Question,
        /// Data fetched for this turn
        snapshot: Snapshot,
    },
    /// Waiting for the completion endpoint
    AwaitingCompletion {
        /// Request built for this turn
        request: CompletionRequest,
    },
    /// Showing the answer or the error
    Presenting {
        /// What the turn produced
        outcome: TurnOutcome,
    },
    /// Terminal state
    Stopped,
}

impl SessionState {
    /// Short state name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingInput => "awaiting_input",
            Self::FetchingSnapshot { .. } => "fetching_snapshot",
            Self::Packaging { .. } => "packaging",
            Self::AwaitingCompletion { .. } => "awaiting_completion",
            Self::Presenting { .. } => "presenting",
            Self::Stopped => "stopped",
        }
    }
}

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Turns started (exit keywords are not turns)
    pub turns: usize,
    /// Turns that ended with an error instead of an answer
    pub failures: usize,
}

/// Host role: wires the snapshot provider and the completion client together
pub struct SessionHost {
    provider: Box<dyn SnapshotProvider>,
    client: Box<dyn CompletionClient>,
    packager: ContextPackager,
    mode: ContextMode,
}

impl SessionHost {
    /// Create a host from explicit components
    pub fn new(
        provider: Box<dyn SnapshotProvider>,
        client: Box<dyn CompletionClient>,
        packager: ContextPackager,
        mode: ContextMode,
    ) -> Self {
        Self {
            provider,
            client,
            packager,
            mode,
        }
    }

    /// Create the HTTP-backed host described by a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiLensError::Config` if a component cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = HttpSnapshotProvider::new(&config.source)?;
        let client = create_completion_client(&config.completion)?;
        Ok(Self::new(
            Box::new(provider),
            client,
            ContextPackager::new(config.completion.model.clone()),
            config.session.mode,
        ))
    }

    /// Mode used when packaging each turn
    pub fn mode(&self) -> ContextMode {
        self.mode
    }

    /// Prompt shown while awaiting input
    pub fn prompt(&self) -> String {
        format!("{} You: ", self.mode.colored_tag())
    }

    /// Fetch a snapshot without involving the model
    ///
    /// # Errors
    ///
    /// Propagates the snapshot provider's error
    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.provider.fetch().await
    }

    /// Run one turn and return the answer, propagating any failure
    ///
    /// Used for one-shot questions where there is no loop to return to.
    pub async fn ask(&self, question: &Question) -> Result<String> {
        let snapshot = self.provider.fetch().await?;
        let request = self.packager.package(&snapshot, question, self.mode);
        self.client.complete(&request).await
    }

    /// Run the interactive loop until an exit keyword or end of input
    ///
    /// # Errors
    ///
    /// Only input/output failures end the loop with an error. Snapshot and
    /// completion failures are reported in `out` and the loop continues.
    pub async fn run<R, W>(&self, input: &mut R, out: &mut W) -> Result<SessionStats>
    where
        R: LineReader + ?Sized,
        W: Write + ?Sized,
    {
        let mut stats = SessionStats::default();
        let mut state = SessionState::AwaitingInput;

        loop {
            state = match state {
                SessionState::Stopped => break,
                SessionState::AwaitingInput => self.await_input(input)?,
                started => {
                    stats.turns += 1;
                    let span = tracing::info_span!("turn", turn = stats.turns);
                    if self.drive_turn(started, out).instrument(span).await? {
                        stats.failures += 1;
                    }
                    SessionState::AwaitingInput
                }
            };
        }

        tracing::info!(
            turns = stats.turns,
            failures = stats.failures,
            "Session stopped"
        );
        Ok(stats)
    }

    fn await_input<R>(&self, input: &mut R) -> Result<SessionState>
    where
        R: LineReader + ?Sized,
    {
        let next = match input.read_line(&self.prompt())? {
            None => SessionState::Stopped,
            Some(line) if is_exit_keyword(&line) => SessionState::Stopped,
            Some(line) => {
                let question = line.trim().to_string();
                input.add_history(&question);
                SessionState::FetchingSnapshot {
                    question: Question::new(question),
                }
            }
        };
        tracing::debug!(from = "awaiting_input", to = next.name(), "State transition");
        Ok(next)
    }

    /// Advance a started turn until it is back at `AwaitingInput`
    ///
    /// Returns whether the turn failed.
    async fn drive_turn<W>(&self, mut state: SessionState, out: &mut W) -> Result<bool>
    where
        W: Write + ?Sized,
    {
        let mut failed = false;
        loop {
            if let SessionState::Presenting {
                outcome: TurnOutcome::Failed(_),
            } = &state
            {
                failed = true;
            }

            let from = state.name();
            state = self.advance(state, out).await?;
            tracing::debug!(from, to = state.name(), "State transition");

            if matches!(state, SessionState::AwaitingInput | SessionState::Stopped) {
                return Ok(failed);
            }
        }
    }

    /// Perform a single transition out of a turn state
    ///
    /// `AwaitingInput` and `Stopped` are returned unchanged; input is read
    /// by the loop itself.
    pub async fn advance<W>(&self, state: SessionState, out: &mut W) -> Result<SessionState>
    where
        W: Write + ?Sized,
    {
        let next = match state {
            SessionState::FetchingSnapshot { question } => {
                writeln!(out, "\n{}", self.mode.fetching_notice())?;
                match self.provider.fetch().await {
                    Ok(snapshot) => SessionState::Packaging { question, snapshot },
                    Err(e) => SessionState::Presenting {
                        outcome: TurnOutcome::Failed(e),
                    },
                }
            }
            SessionState::Packaging { question, snapshot } => {
                writeln!(out, "{}\n", self.mode.thinking_notice())?;
                SessionState::AwaitingCompletion {
                    request: self.packager.package(&snapshot, &question, self.mode),
                }
            }
            SessionState::AwaitingCompletion { request } => {
                let outcome = match self.client.complete(&request).await {
                    Ok(answer) => TurnOutcome::Answered(answer),
                    Err(e) => TurnOutcome::Failed(e),
                };
                SessionState::Presenting { outcome }
            }
            SessionState::Presenting { outcome } => {
                present(&outcome, out)?;
                SessionState::AwaitingInput
            }
            other @ (SessionState::AwaitingInput | SessionState::Stopped) => other,
        };
        Ok(next)
    }
}

/// Write an answer block or an error line
fn present<W>(outcome: &TurnOutcome, out: &mut W) -> Result<()>
where
    W: Write + ?Sized,
{
    match outcome {
        TurnOutcome::Answered(answer) => {
            writeln!(out, "Assistant:")?;
            writeln!(out, "{}", answer)?;
            writeln!(out, "\n{}\n", "-".repeat(SEPARATOR_WIDTH))?;
        }
        TurnOutcome::Failed(e) => {
            tracing::warn!(kind = error_kind(e), "Turn failed: {:#}", e);
            writeln!(out, "\n❌ Error: {}\n", e)?;
        }
    }
    out.flush()?;
    Ok(())
}
