//! Test utilities for APILens
//!
//! Test doubles for the snapshot provider, the completion client and the
//! session input, plus small helpers for building typed errors.

use crate::error::{ApiLensError, Result, Service};
use crate::providers::{CompletionClient, CompletionRequest};
use crate::session::LineReader;
use crate::snapshot::{Snapshot, SnapshotProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared call counter handed out before a double is boxed
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Number of calls recorded so far
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Build a `RemoteStatus` error as it would come out of a component
pub fn remote_status(service: Service, status: u16) -> anyhow::Error {
    ApiLensError::RemoteStatus {
        service,
        status,
        body: "error body".to_string(),
    }
    .into()
}

type Scripted<T> = Mutex<VecDeque<Result<T>>>;

fn next_scripted<T>(script: &Scripted<T>, what: &str) -> Result<T> {
    script
        .lock()
        .expect("script lock poisoned")
        .pop_front()
        .unwrap_or_else(|| Err(anyhow::anyhow!("{} script exhausted", what)))
}

/// Snapshot provider returning scripted results and counting calls
pub struct CountingSnapshotProvider {
    script: Scripted<String>,
    calls: CallCounter,
    repeat: Option<String>,
}

impl CountingSnapshotProvider {
    /// Always return `text`
    pub fn ok(text: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: CallCounter::default(),
            repeat: Some(text.to_string()),
        }
    }

    /// Return each result once, in order
    pub fn scripted(results: Vec<Result<String>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            calls: CallCounter::default(),
            repeat: None,
        }
    }

    /// Handle to the call counter
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl SnapshotProvider for CountingSnapshotProvider {
    async fn fetch(&self) -> Result<Snapshot> {
        self.calls.bump();
        if let Some(text) = &self.repeat {
            return Ok(Snapshot::new(text.clone()));
        }
        next_scripted(&self.script, "snapshot").map(Snapshot::new)
    }
}

/// Completion client returning scripted answers and recording requests
pub struct ScriptedCompletionClient {
    script: Scripted<String>,
    calls: CallCounter,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedCompletionClient {
    /// Answer with each string once, in order
    pub fn answering<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(answers.into_iter().map(|a| Ok(a.into())).collect())
    }

    /// Return each result once, in order
    pub fn scripted(results: Vec<Result<String>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            calls: CallCounter::default(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the call counter
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    /// Handle to the requests received so far
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.bump();
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request.clone());
        next_scripted(&self.script, "completion")
    }
}

/// Input source replaying fixed lines, then reporting end of input
pub struct ScriptedInput {
    lines: VecDeque<String>,
    history: Vec<String>,
}

impl ScriptedInput {
    /// Replay `lines` in order
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            history: Vec::new(),
        }
    }

    /// Questions accepted into history
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl LineReader for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counting_provider_repeats_and_counts() {
        let provider = CountingSnapshotProvider::ok("x");
        let calls = provider.calls();
        assert_eq!(provider.fetch().await.unwrap().as_str(), "x");
        assert_eq!(provider.fetch().await.unwrap().as_str(), "x");
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_scripted_client_exhausts() {
        let client = ScriptedCompletionClient::answering(["only"]);
        let request = CompletionRequest {
            model: "m".to_string(),
            temperature: 0.2,
            messages: Vec::new(),
        };
        assert_eq!(client.complete(&request).await.unwrap(), "only");
        assert!(client.complete(&request).await.is_err());
        assert_eq!(client.requests().lock().unwrap().len(), 2);
    }

    #[test]
    fn test_scripted_input_records_history() {
        let mut input = ScriptedInput::new(["a"]);
        assert_eq!(input.read_line("").unwrap().as_deref(), Some("a"));
        input.add_history("a");
        assert_eq!(input.read_line("").unwrap(), None);
        assert_eq!(input.history(), ["a".to_string()]);
    }
}
