//! Pipeline orchestrator — drives record → convert → score → decide →
//! progress.
//!
//! [`GamePipeline`] owns the [`RecordingSession`] and responds to
//! [`PipelineCommand`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Flow
//!
//! ```text
//! Start  ──▶ session.start()                       [Recording]
//! Stop   ──▶ session.stop() → CanonicalAudioAsset  [Converting → Complete]
//!              └─▶ spawn: scoring.submit()         [awaiting_score]
//!                    ├─ stale generation → discarded
//!                    ├─ Ok  → decide() → progression.apply_verdict()
//!                    └─ Err → user-facing message; asset retained
//! Retry  ──▶ re-submit the retained asset (no re-recording)
//! Cancel ──▶ session.cancel(); in-flight result will be discarded
//! ```
//!
//! Scoring runs in a spawned task so the command loop stays responsive; a
//! generation counter bumped by `Start` and `Cancel` guarantees a response
//! from a superseded session is never applied to current state.  Retries are
//! never automatic — `Retry` is always a distinct user command.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::audio::CanonicalAudioAsset;
use crate::game::{AgeCohort, Level};
use crate::scoring::{decide, FeedbackClient, ScoringClient, ScoringError};
use crate::session::{RecordingSession, SessionError};

use super::state::SharedState;

// ---------------------------------------------------------------------------
// PipelineCommand
// ---------------------------------------------------------------------------

/// Commands a front end sends to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineCommand {
    /// Begin a new recording session.
    Start,
    /// Stop recording and submit for scoring.
    Stop,
    /// Abort the current session; any in-flight score is discarded.
    Cancel,
    /// Re-submit the last recording without re-recording.
    Retry,
}

// ---------------------------------------------------------------------------
// GamePipeline
// ---------------------------------------------------------------------------

/// Drives the complete practice round pipeline.
///
/// Create with [`GamePipeline::new`], then call [`run`](Self::run) inside a
/// tokio task.  The session controller, scoring client, and (optionally) the
/// feedback client are injected, so the whole pipeline runs under tests with
/// doubles only.
pub struct GamePipeline {
    state: SharedState,
    session: RecordingSession,
    scoring: Arc<dyn ScoringClient>,
    feedback: Option<Arc<FeedbackClient>>,
    cohort: AgeCohort,
    levels: &'static [Level],
    last_asset: Arc<Mutex<Option<CanonicalAudioAsset>>>,
    generation: Arc<AtomicU64>,
    in_flight: Option<tokio::task::JoinHandle<()>>,
}

impl GamePipeline {
    /// Create a new pipeline for `cohort`'s content.
    pub fn new(
        state: SharedState,
        session: RecordingSession,
        scoring: Arc<dyn ScoringClient>,
        feedback: Option<Arc<FeedbackClient>>,
        cohort: AgeCohort,
    ) -> Self {
        Self {
            state,
            session,
            scoring,
            feedback,
            cohort,
            levels: cohort.levels(),
            last_asset: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the pipeline until the command channel is closed.
    ///
    /// The final in-flight scoring task (if any) is awaited before returning
    /// so that callers observe a settled state.
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<PipelineCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                PipelineCommand::Start => self.handle_start(),
                PipelineCommand::Stop => self.handle_stop(),
                PipelineCommand::Cancel => self.handle_cancel(),
                PipelineCommand::Retry => self.handle_retry(),
            }
        }

        if let Some(task) = self.in_flight.take() {
            if task.await.is_err() {
                log::warn!("pipeline: scoring task panicked during shutdown");
            }
        }
        log::info!("pipeline: command channel closed, shutting down");
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    /// Start a new session.  Supersedes any in-flight scoring response.
    fn handle_start(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        // A finished session (Complete/Failed) holds no stream; reset it to
        // Idle so the strict start-only-from-Idle rule applies to active
        // sessions only.
        if !self.session.state().is_busy() {
            self.session.cancel();
        }

        match self.session.start() {
            Ok(()) => {
                let mut st = self.state.lock().unwrap();
                st.session = self.session.state();
                st.awaiting_score = false;
                st.error_message = None;
                st.last_result = None;
                st.last_verdict = None;
                st.feedback_text = None;
            }
            Err(e) => self.set_session_error(e),
        }
    }

    /// Stop recording, convert, and submit for scoring.
    fn handle_stop(&mut self) {
        let asset = match self.session.stop() {
            Ok(asset) => asset,
            Err(e) => {
                self.set_session_error(e);
                return;
            }
        };

        {
            let mut st = self.state.lock().unwrap();
            st.session = self.session.state();
        }

        // Retained so a failed submission can be retried without
        // re-recording.
        *self.last_asset.lock().unwrap() = Some(asset.clone());
        self.submit(asset);
    }

    /// Abort the session and invalidate any in-flight scoring response.
    fn handle_cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.session.cancel();

        let mut st = self.state.lock().unwrap();
        st.session = self.session.state();
        st.awaiting_score = false;
        st.error_message = None;
    }

    /// Re-submit the retained asset.  Ignored when nothing was recorded yet,
    /// a session is currently busy, or a submission is already in flight.
    fn handle_retry(&mut self) {
        if self.session.state().is_busy() {
            log::warn!("pipeline: retry ignored while session is busy");
            return;
        }
        if self.state.lock().unwrap().awaiting_score {
            log::warn!("pipeline: retry ignored while a submission is in flight");
            return;
        }
        let asset = match self.last_asset.lock().unwrap().clone() {
            Some(asset) => asset,
            None => {
                log::warn!("pipeline: retry ignored, no recording to re-submit");
                return;
            }
        };
        self.submit(asset);
    }

    // -----------------------------------------------------------------------
    // Scoring submission
    // -----------------------------------------------------------------------

    /// Spawn the scoring request for `asset` against the current prompt.
    ///
    /// The task applies its outcome to shared state only when its generation
    /// is still current; otherwise the response is dropped on the floor
    /// (fire-and-forget abandonment, no server-side cancellation).
    fn submit(&mut self, asset: CanonicalAudioAsset) {
        let expected = {
            let st = self.state.lock().unwrap();
            match st.progression.current_prompt(self.levels) {
                Some(prompt) => prompt.to_string(),
                None => {
                    log::info!("pipeline: no prompt left, nothing to score");
                    return;
                }
            }
        };

        {
            let mut st = self.state.lock().unwrap();
            st.awaiting_score = true;
            st.error_message = None;
        }

        let generation = Arc::clone(&self.generation);
        let submitted_gen = generation.load(Ordering::SeqCst);
        let scoring = Arc::clone(&self.scoring);
        let feedback = self.feedback.clone();
        let state = Arc::clone(&self.state);
        let levels = self.levels;
        let age = self.cohort.representative_age();

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = scoring.submit(&asset, &expected).await;

            if generation.load(Ordering::SeqCst) != submitted_gen {
                log::debug!("pipeline: discarding stale scoring response");
                return;
            }

            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    let mut st = state.lock().unwrap();
                    st.awaiting_score = false;
                    st.error_message = Some(scoring_error_message(&e));
                    log::warn!("pipeline: scoring failed: {e}");
                    return;
                }
            };

            let verdict = decide(&result, &expected);
            {
                let mut st = state.lock().unwrap();
                st.awaiting_score = false;
                st.last_verdict = Some(verdict);
                st.last_result = Some(result.clone());
                let advance = st.progression.apply_verdict(verdict, levels);
                log::info!(
                    "pipeline: verdict {} for {:?} → {:?}",
                    verdict,
                    expected,
                    advance
                );
            }

            // Display-only coaching; failures are logged and swallowed.
            if let Some(client) = feedback {
                match client.fetch(&result, age).await {
                    Ok(fb) => {
                        if generation.load(Ordering::SeqCst) == submitted_gen {
                            state.lock().unwrap().feedback_text = Some(fb.text);
                        }
                    }
                    Err(e) => log::warn!("pipeline: feedback unavailable: {e}"),
                }
            }
        }));
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_session_error(&mut self, error: SessionError) {
        let mut st = self.state.lock().unwrap();
        st.session = self.session.state();
        st.error_message = Some(session_error_message(&error));
        log::warn!("pipeline: session error: {error}");
    }
}

/// User-facing message for a session failure.
fn session_error_message(error: &SessionError) -> String {
    match error {
        SessionError::Busy => "A recording is already in progress.".into(),
        SessionError::NotRecording => "Nothing is being recorded right now.".into(),
        SessionError::Permission(_) => {
            "Microphone unavailable — please allow microphone access and try again.".into()
        }
        SessionError::Decode(_) => {
            "We couldn't process that recording — please try recording again.".into()
        }
    }
}

/// User-facing message for a scoring failure.  The recording is retained, so
/// every message invites a retry rather than a re-record.
fn scoring_error_message(error: &ScoringError) -> String {
    match error {
        ScoringError::Timeout => {
            "The scoring service took too long — tap retry to send your recording again.".into()
        }
        ScoringError::Service { message, .. } => {
            format!("The scoring service had a problem ({message}) — tap retry.")
        }
        ScoringError::Request(_) | ScoringError::Parse(_) => {
            "We couldn't reach the scoring service — tap retry.".into()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
