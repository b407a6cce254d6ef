//! HTTP client for the external scoring service.
//!
//! [`ScoringClient`] is the async seam the pipeline depends on;
//! [`HttpScoringClient`] is the production implementation.  It POSTs the
//! canonical WAV plus the expected text as a multipart form to
//! `{base_url}/score` and parses the response on a best-effort basis —
//! the schema is externally owned, so missing optional fields never fail
//! a submission.

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::CanonicalAudioAsset;
use crate::config::ScoringConfig;
use crate::scoring::result::ScoreResult;

// ---------------------------------------------------------------------------
// ScoringError
// ---------------------------------------------------------------------------

/// Errors that can occur while submitting audio for scoring.
///
/// All variants are recoverable; the session's audio is retained so retry
/// re-submits without re-recording.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The request did not complete within the configured timeout.
    #[error("scoring request timed out")]
    Timeout,

    /// HTTP transport or connection error.
    #[error("scoring request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("scoring service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("failed to parse scoring response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ScoringError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScoringError::Timeout
        } else {
            ScoringError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringClient trait
// ---------------------------------------------------------------------------

/// Async interface to a scoring backend.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn ScoringClient>` across the pipeline task and a UI task.
#[async_trait]
pub trait ScoringClient: Send + Sync {
    /// Submit `asset` with the prompt the user was asked to say and return
    /// the normalised result.
    async fn submit(
        &self,
        asset: &CanonicalAudioAsset,
        expected: &str,
    ) -> Result<ScoreResult, ScoringError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ScoringClient>) {}
};

// ---------------------------------------------------------------------------
// HttpScoringClient
// ---------------------------------------------------------------------------

/// Production client: multipart POST to `{base_url}/score`.
///
/// Form fields follow the wire contract: `expected` (text) and `audio`
/// (binary WAV).  The per-request timeout comes from [`ScoringConfig`];
/// a default client is the last-resort fallback if the builder fails.
pub struct HttpScoringClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScoringClient {
    /// Build a client from application config.
    pub fn from_config(config: &ScoringConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Pull a human-readable message out of an error body.
    ///
    /// The service usually answers errors as JSON with one of a few message
    /// keys; plain-text bodies are used as-is, and an empty body falls back
    /// to a generic description.
    fn extract_error_message(body: &str) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            for key in ["message", "error", "detail"] {
                if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                    return msg.to_string();
                }
            }
        }
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "scoring service returned an error".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[async_trait]
impl ScoringClient for HttpScoringClient {
    async fn submit(
        &self,
        asset: &CanonicalAudioAsset,
        expected: &str,
    ) -> Result<ScoreResult, ScoringError> {
        let url = format!("{}/score", self.base_url);

        let audio_part = reqwest::multipart::Part::bytes(asset.as_bytes().to_vec())
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| ScoringError::Request(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("expected", expected.to_string())
            .part("audio", audio_part);

        log::debug!(
            "scoring: POST {url} ({} audio bytes, expected {:?})",
            asset.as_bytes().len(),
            expected
        );

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::extract_error_message(&body);
            log::warn!("scoring: service error {status}: {message}");
            return Err(ScoringError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ScoringError::Parse(e.to_string()))?;

        Ok(ScoreResult::from_value(&value))
    }
}

// ---------------------------------------------------------------------------
// MockScoringClient  (test-only)
// ---------------------------------------------------------------------------

/// Test double that answers `submit` from a queue of canned responses, with
/// an optional delay so cancellation races can be exercised.  When the queue
/// runs dry the last `Ok` response is repeated (errors are not Clone).
#[cfg(test)]
pub struct MockScoringClient {
    queue: std::sync::Mutex<std::collections::VecDeque<Result<ScoreResult, ScoringError>>>,
    fallback: Option<ScoreResult>,
    delay: Option<std::time::Duration>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockScoringClient {
    /// A mock that always resolves `Ok` with the result parsed from `value`.
    pub fn ok(value: serde_json::Value) -> Self {
        Self {
            queue: std::sync::Mutex::new(std::collections::VecDeque::new()),
            fallback: Some(ScoreResult::from_value(&value)),
            delay: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// A mock that resolves `Err(error)` once, then falls back to nothing
    /// (further calls fail with a generic request error).
    pub fn err(error: ScoringError) -> Self {
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(Err(error));
        Self {
            queue: std::sync::Mutex::new(queue),
            fallback: None,
            delay: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Queue an additional `Ok` response ahead of the fallback.
    pub fn then_ok(self, value: serde_json::Value) -> Self {
        self.queue
            .lock()
            .unwrap()
            .push_back(Ok(ScoreResult::from_value(&value)));
        self
    }

    /// Delay each `submit` before resolving.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `submit` calls seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl ScoringClient for MockScoringClient {
    async fn submit(
        &self,
        _asset: &CanonicalAudioAsset,
        _expected: &str,
    ) -> Result<ScoreResult, ScoringError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(response) = self.queue.lock().unwrap().pop_front() {
            return response;
        }
        match &self.fallback {
            Some(result) => Ok(result.clone()),
            None => Err(ScoringError::Request("mock exhausted".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
