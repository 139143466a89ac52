//! Provider module for APILens
//!
//! This module contains the completion client abstraction and its
//! implementation for OpenAI-compatible chat-completions endpoints.

pub mod base;
pub mod chat_completions;

pub use base::{
    Choice, ChoiceMessage, CompletionClient, CompletionRequest, CompletionResponse, Message,
};
pub use chat_completions::ChatCompletionsClient;

use crate::config::CompletionConfig;
use crate::error::Result;

/// Create the completion client described by the configuration
///
/// # Errors
///
/// Returns error if the client cannot be initialized (missing API key)
pub fn create_completion_client(config: &CompletionConfig) -> Result<Box<dyn CompletionClient>> {
    Ok(Box::new(ChatCompletionsClient::new(config)?))
}
