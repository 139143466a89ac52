//! Prompt templates and the context packager
//!
//! This module turns a snapshot and a question into the two-message
//! completion request. The system message comes from the
//! [`ContextMode`](crate::context_mode::ContextMode); the user message embeds
//! the snapshot and the question using the literal templates below.

pub mod packager;

pub use packager::{ContextPackager, Question, SAMPLING_TEMPERATURE};

use crate::context_mode::{ContextMode, LIVE_DATA_TOOL};

/// Builds the user turn embedding the data and the question
///
/// Direct mode:
///
/// ```text
///
/// API RESPONSE:
/// <snapshot>
///
/// QUESTION:
/// <question>
/// ```
///
/// Tool-constrained mode labels the data as the result of the
/// `get_live_api_data` tool and the question as `USER QUESTION:`.
///
/// # Examples
///
/// ```
/// use apilens::context_mode::ContextMode;
/// use apilens::prompts::build_user_content;
///
/// let content = build_user_content(ContextMode::Direct, "{}", "Anything?");
/// assert!(content.contains("API RESPONSE:\n{}"));
/// assert!(content.contains("QUESTION:\nAnything?"));
/// ```
pub fn build_user_content(mode: ContextMode, snapshot: &str, question: &str) -> String {
    match mode {
        ContextMode::Direct => format!(
            "\nAPI RESPONSE:\n{}\n\nQUESTION:\n{}\n",
            snapshot, question
        ),
        ContextMode::ToolConstrained => format!(
            "\nMCP TOOL RESULT ({}):\n{}\n\nUSER QUESTION:\n{}\n",
            LIVE_DATA_TOOL, snapshot, question
        ),
    }
}
