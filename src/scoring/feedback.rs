//! Coaching feedback client.
//!
//! After a scoring round the app can ask the feedback service for
//! age-appropriate coaching text (and optionally synthesised audio).  This
//! is display-only: feedback failures are logged and never affect the
//! verdict or progression, so the caller treats `Err` as "no feedback this
//! round".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::result::ScoreResult;

// ---------------------------------------------------------------------------
// FeedbackError
// ---------------------------------------------------------------------------

/// Errors from the feedback service.  Always non-fatal.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback request timed out")]
    Timeout,

    #[error("feedback request failed: {0}")]
    Request(String),

    #[error("feedback service error ({0})")]
    Service(u16),

    #[error("failed to parse feedback response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FeedbackError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FeedbackError::Timeout
        } else {
            FeedbackError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /feedback`.
#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    scoring_result: &'a serde_json::Value,
    age: u8,
}

/// Response from the feedback service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Feedback {
    /// Coaching text to display.
    pub text: String,

    /// Optional base64-encoded audio rendition of the text.
    #[serde(default)]
    pub audio_base64: Option<String>,
}

// ---------------------------------------------------------------------------
// FeedbackClient
// ---------------------------------------------------------------------------

/// Client for `{base_url}/feedback`.
pub struct FeedbackClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedbackClient {
    /// Build a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Request coaching feedback for `result`, tailored to the user's age.
    pub async fn fetch(&self, result: &ScoreResult, age: u8) -> Result<Feedback, FeedbackError> {
        let url = format!("{}/feedback", self.base_url);
        let body = FeedbackRequest {
            scoring_result: &result.raw,
            age,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("feedback: service error {status}");
            return Err(FeedbackError::Service(status.as_u16()));
        }

        response
            .json::<Feedback>()
            .await
            .map_err(|e| FeedbackError::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_builds_without_panic() {
        let _client = FeedbackClient::new("https://feedback.example.test/", 10);
    }

    #[test]
    fn request_body_serialises_raw_result_and_age() {
        let result = ScoreResult::from_value(&json!({ "score": 0.9, "asr_text": "hi" }));
        let body = FeedbackRequest {
            scoring_result: &result.raw,
            age: 7,
        };
        let encoded = serde_json::to_value(&body).unwrap();
        assert_eq!(
            encoded,
            json!({
                "scoring_result": { "score": 0.9, "asr_text": "hi" },
                "age": 7
            })
        );
    }

    #[test]
    fn feedback_parses_with_and_without_audio() {
        let with: Feedback =
            serde_json::from_value(json!({ "text": "Great job!", "audio_base64": "QUJD" }))
                .unwrap();
        assert_eq!(with.text, "Great job!");
        assert_eq!(with.audio_base64.as_deref(), Some("QUJD"));

        let without: Feedback = serde_json::from_value(json!({ "text": "Try again" })).unwrap();
        assert_eq!(without.text, "Try again");
        assert!(without.audio_base64.is_none());
    }
}
