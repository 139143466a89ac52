//! Context packager
//!
//! Pure construction of a [`CompletionRequest`] from a snapshot, a question
//! and a mode. No I/O happens here and identical inputs always produce an
//! identical request.

use crate::context_mode::ContextMode;
use crate::providers::{CompletionRequest, Message};
use crate::snapshot::Snapshot;
use std::fmt;

/// Sampling temperature used for every request
///
/// Low, to keep factual lookups close to deterministic.
pub const SAMPLING_TEMPERATURE: f64 = 0.2;

/// A user's question for a single turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// Wrap the question text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the question text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds completion requests for a fixed model
///
/// # Examples
///
/// ```
/// use apilens::context_mode::ContextMode;
/// use apilens::prompts::{ContextPackager, Question};
/// use apilens::snapshot::Snapshot;
///
/// let packager = ContextPackager::new("llama3-70b-8192");
/// let request = packager.package(
///     &Snapshot::new("{\n  \"status\": \"ok\"\n}"),
///     &Question::new("What is the status?"),
///     ContextMode::Direct,
/// );
/// assert_eq!(request.messages.len(), 2);
/// assert_eq!(request.messages[0].role, "system");
/// assert_eq!(request.messages[1].role, "user");
/// ```
#[derive(Debug, Clone)]
pub struct ContextPackager {
    model: String,
}

impl ContextPackager {
    /// Create a packager targeting `model`
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Model identifier placed in every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the two-message request for one turn
    pub fn package(
        &self,
        snapshot: &Snapshot,
        question: &Question,
        mode: ContextMode,
    ) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            temperature: SAMPLING_TEMPERATURE,
            messages: vec![
                Message::system(mode.system_instruction()),
                Message::user(super::build_user_content(
                    mode,
                    snapshot.as_str(),
                    question.as_str(),
                )),
            ],
        }
    }
}
