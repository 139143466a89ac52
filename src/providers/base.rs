//! Completion client trait and wire types for APILens
//!
//! This module defines the [`CompletionClient`] trait implemented by the
//! remote chat-completion caller, along with the request and response
//! shapes of the chat-completions wire contract.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role-tagged message of a completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system or user)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use apilens::providers::Message;
    ///
    /// let msg = Message::system("Answer from the data only");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use apilens::providers::Message;
    ///
    /// let msg = Message::user("What is the status?");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body sent to the completion endpoint
///
/// Built fresh for every turn and never mutated afterwards. Serializes to
/// `{"model": ..., "temperature": ..., "messages": [{"role", "content"}, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Target model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// System instruction followed by the user turn
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    /// The system instruction, if present
    pub fn system_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.role == "system")
    }

    /// The user turn, if present
    pub fn user_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.role == "user")
    }
}

/// Success body of the completion endpoint
///
/// Only the first choice's message content is ever used.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    /// Candidate completions
    pub choices: Vec<Choice>,
}

/// One candidate completion
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Generated message
    pub message: ChoiceMessage,
}

/// Message of a candidate completion
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text; null when the model produced none
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, if the envelope has one
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// Tool caller role: sends a packaged request to the completion model
///
/// # Examples
///
/// ```
/// use apilens::providers::{CompletionClient, CompletionRequest};
/// use async_trait::async_trait;
///
/// struct Echo;
///
/// #[async_trait]
/// impl CompletionClient for Echo {
///     async fn complete(&self, request: &CompletionRequest) -> apilens::Result<String> {
///         Ok(request.model.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the request and return the first choice's text verbatim
    ///
    /// # Errors
    ///
    /// - `ApiLensError::Transport` if the request cannot be sent or times out
    /// - `ApiLensError::RemoteStatus` on a non-success status
    /// - `ApiLensError::MalformedResponse` if the body is not the expected envelope
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
