//! Configuration management for APILens
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from dotenv files, YAML files, environment variables,
//! and CLI overrides.
//!
//! Configuration is built once at startup. After [`Config::validate`]
//! succeeds it is treated as read-only and passed by reference into every
//! component.

use crate::context_mode::ContextMode;
use crate::error::{ApiLensError, Result};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Main configuration structure for APILens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion endpoint settings
    #[serde(default)]
    pub completion: CompletionConfig,
    /// External data source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Interactive session settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Remote chat-completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Bearer token for the completion endpoint
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Full URL of the chat-completions endpoint
    #[serde(default = "default_completion_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_completion_timeout")]
    pub timeout_seconds: u64,
}

fn default_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_completion_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_completion_timeout() -> u64 {
    30
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_completion_endpoint(),
            timeout_seconds: default_completion_timeout(),
        }
    }
}

/// External data API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL fetched on every turn
    #[serde(default)]
    pub url: Option<String>,

    /// Extra request headers sent with every fetch
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Request timeout in seconds
    #[serde(default = "default_source_timeout")]
    pub timeout_seconds: u64,
}

fn default_source_timeout() -> u64 {
    20
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            headers: BTreeMap::new(),
            timeout_seconds: default_source_timeout(),
        }
    }
}

/// Interactive session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Instruction mode used when packaging each turn
    #[serde(default)]
    pub mode: ContextMode,
}

impl Config {
    /// Load configuration from file with dotenv, environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file (optional on disk)
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns `ApiLensError::Config` if a file cannot be read or parsed,
    /// or if an environment override is malformed in a way that cannot be
    /// ignored (for example `API_HEADERS` that is not a JSON object)
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        load_env_file(cli.env_file.as_deref())?;

        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars()?;
        config.apply_cli_overrides(cli)?;

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiLensError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ApiLensError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) -> Result<()> {
        if let Some(api_key) = non_empty_var("GROQ_API_KEY") {
            self.completion.api_key = Some(api_key);
        }

        if let Some(model) = non_empty_var("GROQ_MODEL") {
            self.completion.model = model;
        }

        if let Some(endpoint) = non_empty_var("APILENS_COMPLETION_ENDPOINT") {
            self.completion.endpoint = endpoint;
        }

        if let Some(url) = non_empty_var("API_URL") {
            self.source.url = Some(url);
        }

        if let Some(raw) = non_empty_var("API_HEADERS") {
            self.source.headers = parse_headers_json(&raw)?;
            tracing::debug!(
                count = self.source.headers.len(),
                "Env override: API_HEADERS"
            );
        }

        if let Some(timeout) = non_empty_var("APILENS_COMPLETION_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.completion.timeout_seconds = value,
                Err(_) => tracing::warn!(
                    "Invalid APILENS_COMPLETION_TIMEOUT_SECONDS: {}",
                    timeout
                ),
            }
        }

        if let Some(timeout) = non_empty_var("APILENS_SOURCE_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.source.timeout_seconds = value,
                Err(_) => tracing::warn!("Invalid APILENS_SOURCE_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Some(mode) = non_empty_var("APILENS_MODE") {
            match ContextMode::parse_str(&mode) {
                Ok(value) => self.session.mode = value,
                Err(e) => tracing::warn!("{}, keeping {}", e, self.session.mode),
            }
        }

        Ok(())
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) -> Result<()> {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(mode) = cli.mode_override() {
            self.session.mode = ContextMode::parse_str(mode).map_err(ApiLensError::Config)?;
        }

        Ok(())
    }

    /// Validate the configuration
    ///
    /// Ensures the credential and target URL are present, both URLs are
    /// usable http(s) URLs, timeouts are non-zero and every configured
    /// header is a legal HTTP header.
    ///
    /// # Errors
    ///
    /// Returns `ApiLensError::Config` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        let api_key_missing = self
            .completion
            .api_key
            .as_deref()
            .map_or(true, |k| k.trim().is_empty());
        let url_missing = self
            .source
            .url
            .as_deref()
            .map_or(true, |u| u.trim().is_empty());

        if api_key_missing || url_missing {
            return Err(ApiLensError::Config(
                "Missing GROQ_API_KEY or API_URL (set them in the environment, a .env file, or the config file)"
                    .to_string(),
            )
            .into());
        }

        if let Some(url) = &self.source.url {
            validate_http_url("API_URL", url)?;
        }
        validate_http_url("completion endpoint", &self.completion.endpoint)?;

        if self.completion.model.trim().is_empty() {
            return Err(ApiLensError::Config("Model name cannot be empty".to_string()).into());
        }

        if self.completion.timeout_seconds == 0 || self.source.timeout_seconds == 0 {
            return Err(
                ApiLensError::Config("Timeouts must be greater than 0".to_string()).into(),
            );
        }

        for (name, value) in &self.source.headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApiLensError::Config(format!("Invalid header name '{}': {}", name, e))
            })?;
            HeaderValue::from_str(value).map_err(|e| {
                ApiLensError::Config(format!("Invalid value for header '{}': {}", name, e))
            })?;
        }

        Ok(())
    }

    /// Target data URL, if configured
    pub fn source_url(&self) -> Option<&str> {
        self.source.url.as_deref()
    }
}

/// Load a dotenv file into the process environment
///
/// An explicit path must exist; the implicit `./.env` is optional.
/// Variables already present in the environment are not overwritten.
fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| {
                ApiLensError::Config(format!(
                    "Failed to load env file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            tracing::debug!("Loaded environment from {}", path.display());
        }
        None => {
            if let Ok(found) = dotenvy::dotenv() {
                tracing::debug!("Loaded environment from {}", found.display());
            }
        }
    }
    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse the `API_HEADERS` JSON object into a header map
///
/// Non-string JSON values are stored using their JSON text.
fn parse_headers_json(raw: &str) -> Result<BTreeMap<String, String>> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ApiLensError::Config(format!("API_HEADERS is not valid JSON: {}", e)))?;

    let object = value.as_object().ok_or_else(|| {
        ApiLensError::Config("API_HEADERS must be a JSON object".to_string())
    })?;

    Ok(object
        .iter()
        .map(|(k, v)| {
            let v = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), v)
        })
        .collect())
}

fn validate_http_url(label: &str, raw: &str) -> Result<()> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| ApiLensError::Config(format!("Invalid {} '{}': {}", label, raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ApiLensError::Config(format!(
            "Unsupported scheme '{}' for {}",
            other, label
        ))
        .into()),
    }
}
