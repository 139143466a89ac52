//! Snapshot provider for the live data source
//!
//! This module fetches the configured API once per call and normalizes the
//! response into a single text blob:
//! - JSON responses are re-serialized with 2-space indentation, keeping the
//!   source key order
//! - anything else is returned exactly as received
//!
//! There is no caching of any kind. Every call is a fresh round trip.

use crate::config::SourceConfig;
use crate::error::{ApiLensError, Result, Service};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Normalized text representation of the data source at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    /// Wrap already-normalized text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the snapshot text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Size of the snapshot in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the snapshot and return its text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tool provider role: produces a fresh [`Snapshot`] on demand
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Fetch the current state of the data source
    ///
    /// # Errors
    ///
    /// - `ApiLensError::Transport` if the request cannot be sent or times out
    /// - `ApiLensError::RemoteStatus` if the source answers with a failure status
    /// - `ApiLensError::MalformedResponse` if a JSON body does not parse
    async fn fetch(&self) -> Result<Snapshot>;
}

/// HTTP implementation of [`SnapshotProvider`]
///
/// # Examples
///
/// ```no_run
/// use apilens::config::SourceConfig;
/// use apilens::snapshot::{HttpSnapshotProvider, SnapshotProvider};
///
/// # async fn example() -> apilens::Result<()> {
/// let config = SourceConfig {
///     url: Some("https://api.example.com/status".to_string()),
///     ..Default::default()
/// };
/// let provider = HttpSnapshotProvider::new(&config)?;
/// let snapshot = provider.fetch().await?;
/// println!("{}", snapshot);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpSnapshotProvider {
    client: Client,
    url: String,
    headers: HeaderMap,
}

impl HttpSnapshotProvider {
    /// Create a provider from the data source configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiLensError::Config` if the URL is missing, a header is not
    /// a legal HTTP header, or the HTTP client cannot be built
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ApiLensError::Config("API_URL is not set".to_string()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApiLensError::Config(format!("Invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ApiLensError::Config(format!("Invalid value for header '{}': {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiLensError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            headers,
        })
    }

    /// URL fetched on every call
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SnapshotProvider for HttpSnapshotProvider {
    async fn fetch(&self) -> Result<Snapshot> {
        tracing::debug!(url = %self.url, "Fetching live data snapshot");

        let response = self
            .client
            .get(&self.url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Data source request failed: {}", e);
                ApiLensError::transport(Service::DataSource, &e)
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Data source returned error {}: {}", status, body);
            return Err(ApiLensError::RemoteStatus {
                service: Service::DataSource,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiLensError::transport(Service::DataSource, &e))?;
        let snapshot = normalize_body(&content_type, body)?;
        tracing::debug!(
            bytes = snapshot.len(),
            content_type = %content_type,
            "Snapshot ready"
        );
        Ok(snapshot)
    }
}

/// Whether a `Content-Type` header value declares JSON
///
/// Matches `application/json` and any `+json` structured suffix, ignoring
/// case and parameters such as `charset`.
pub fn is_json_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

/// Turn a successful response body into a [`Snapshot`]
///
/// # Errors
///
/// Returns `ApiLensError::MalformedResponse` when the content type declares
/// JSON but the body does not parse
pub fn normalize_body(content_type: &str, body: String) -> Result<Snapshot> {
    if !is_json_content_type(content_type) {
        return Ok(Snapshot(body));
    }

    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| ApiLensError::MalformedResponse {
            service: Service::DataSource,
            message: format!("body declared as JSON did not parse: {}", e),
        })?;
    Ok(Snapshot(serde_json::to_string_pretty(&value)?))
}
