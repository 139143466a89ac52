//! Chat-completions client for OpenAI-compatible endpoints (Groq by default)
//!
//! Sends one POST per request with bearer authentication and returns the
//! first choice's message text without any post-processing.

use crate::config::CompletionConfig;
use crate::error::{ApiLensError, Result, Service};
use crate::providers::{CompletionClient, CompletionRequest, CompletionResponse};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP implementation of [`CompletionClient`]
///
/// # Examples
///
/// ```no_run
/// use apilens::config::CompletionConfig;
/// use apilens::providers::{ChatCompletionsClient, CompletionClient, CompletionRequest, Message};
///
/// # async fn example() -> apilens::Result<()> {
/// let config = CompletionConfig {
///     api_key: Some("gsk_...".to_string()),
///     ..Default::default()
/// };
/// let client = ChatCompletionsClient::new(&config)?;
/// let request = CompletionRequest {
///     model: config.model.clone(),
///     temperature: 0.2,
///     messages: vec![Message::user("Hello!")],
/// };
/// let answer = client.complete(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct ChatCompletionsClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ChatCompletionsClient {
    /// Create a client from the completion configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiLensError::Config` if no API key is configured or the
    /// HTTP client cannot be built
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ApiLensError::Config("GROQ_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiLensError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    /// Endpoint every request is posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {}", e);
                ApiLensError::transport(Service::Completion, &e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Completion endpoint returned error {}: {}", status, body);
            return Err(ApiLensError::RemoteStatus {
                service: Service::Completion,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiLensError::transport(Service::Completion, &e))?;
        extract_answer(&body)
    }
}

/// Pull the first choice's message text out of a success body
///
/// # Errors
///
/// Returns `ApiLensError::MalformedResponse` if the body is not JSON, has no
/// `choices` list, the list is empty, or the first choice carries no text
pub fn extract_answer(body: &str) -> Result<String> {
    let envelope: CompletionResponse =
        serde_json::from_str(body).map_err(|e| ApiLensError::MalformedResponse {
            service: Service::Completion,
            message: format!("unexpected response body: {}", e),
        })?;

    if envelope.choices.is_empty() {
        return Err(ApiLensError::MalformedResponse {
            service: Service::Completion,
            message: "response contained no choices".to_string(),
        }
        .into());
    }

    envelope
        .first_content()
        .map(str::to_string)
        .ok_or_else(|| {
            ApiLensError::MalformedResponse {
                service: Service::Completion,
                message: "first choice has no message content".to_string(),
            }
            .into()
        })
}
