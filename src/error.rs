//! Error types for APILens
//!
//! This module defines the error taxonomy used throughout the application,
//! using `thiserror` for ergonomic error handling.
//!
//! Only [`ApiLensError::Config`] is fatal. Every other kind is caught at the
//! turn boundary by the session host and reported to the user.

use std::fmt;
use thiserror::Error;

/// Remote service that produced a transport or status failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// The external data API the snapshot is fetched from
    DataSource,
    /// The remote chat-completion endpoint
    Completion,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataSource => write!(f, "data source"),
            Self::Completion => write!(f, "completion endpoint"),
        }
    }
}

/// Main error type for APILens operations
#[derive(Error, Debug)]
pub enum ApiLensError {
    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection could not be established, or the request timed out
    #[error("Transport error talking to {service}: {message}")]
    Transport {
        /// Which remote was being contacted
        service: Service,
        /// Underlying failure description
        message: String,
    },

    /// Remote answered with a non-success HTTP status
    #[error("{service} returned HTTP {status}: {body}")]
    RemoteStatus {
        /// Which remote answered
        service: Service,
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Success status, but the body did not have the expected shape
    #[error("Malformed response from {service}: {message}")]
    MalformedResponse {
        /// Which remote answered
        service: Service,
        /// What was wrong with the body
        message: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ApiLensError {
    /// Stable short name for the error kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Transport { .. } => "transport",
            Self::RemoteStatus { .. } => "remote_status",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
        }
    }

    /// Build a transport error from a `reqwest` failure
    pub(crate) fn transport(service: Service, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out ({})", err)
        } else if err.is_connect() {
            format!("connection failed ({})", err)
        } else {
            err.to_string()
        };
        Self::Transport { service, message }
    }
}

/// Result type alias for APILens operations
///
/// Uses `anyhow::Error` so call sites can attach context; the typed
/// [`ApiLensError`] is recovered with `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;

/// Classify an `anyhow` error by its [`ApiLensError`] kind
///
/// Returns `"other"` for errors that did not originate as an `ApiLensError`.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<ApiLensError>()
        .map(ApiLensError::kind)
        .unwrap_or("other")
}
