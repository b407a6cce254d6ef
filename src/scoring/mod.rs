//! Scoring service client and correctness decision.
//!
//! This module owns everything that happens after a canonical asset exists:
//! * [`ScoringClient`] / [`HttpScoringClient`] — multipart submission to the
//!   external `/score` endpoint.
//! * [`ScoreResult`] — all-optional view of the response.
//! * [`decide`] — the three-signal correctness heuristic.
//! * [`FeedbackClient`] — display-only coaching feedback from `/feedback`.

pub mod client;
pub mod decision;
pub mod feedback;
pub mod result;

pub use client::{HttpScoringClient, ScoringClient, ScoringError};
pub use decision::{decide, normalize_text, SCORE_THRESHOLD, WORD_OVERLAP_THRESHOLD};
pub use feedback::{Feedback, FeedbackClient, FeedbackError};
pub use result::{normalize_score, ScoreResult};

// test-only re-export for the pipeline test module.
#[cfg(test)]
pub use client::MockScoringClient;
