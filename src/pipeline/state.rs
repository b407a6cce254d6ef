//! Shared game state read by a front end.
//!
//! [`GameState`] is the single source of truth a UI needs: the session
//! phase, the last scoring outcome, coaching feedback, progression, and any
//! user-facing error message.  [`SharedState`] (`Arc<Mutex<GameState>>`) is
//! cheap to clone and safe to share; do not hold the lock across `.await`
//! points.

use std::sync::{Arc, Mutex};

use crate::game::{AgeCohort, ProgressionState};
use crate::scoring::ScoreResult;
use crate::session::SessionState;

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Everything a front end needs to render one practice screen.
pub struct GameState {
    /// Current phase of the recording session machine.
    pub session: SessionState,

    /// Whether a scoring submission is in flight.
    pub awaiting_score: bool,

    /// The most recent scoring result, kept until the next session.
    pub last_result: Option<ScoreResult>,

    /// Verdict derived from `last_result`; `None` before the first round.
    pub last_verdict: Option<bool>,

    /// Coaching feedback text for the last round, when available.
    pub feedback_text: Option<String>,

    /// Progress through the cohort's level table.
    pub progression: ProgressionState,

    /// User-facing error message, cleared on the next start.
    pub error_message: Option<String>,
}

impl GameState {
    /// Fresh state positioned at the first prompt of `cohort`'s content.
    pub fn new(cohort: AgeCohort) -> Self {
        Self {
            session: SessionState::Idle,
            awaiting_score: false,
            last_result: None,
            last_verdict: None,
            feedback_text: None,
            progression: ProgressionState::new(cohort.levels()),
            error_message: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`GameState`].
pub type SharedState = Arc<Mutex<GameState>>;

/// Construct a new [`SharedState`] for `cohort`.
pub fn new_shared_state(cohort: AgeCohort) -> SharedState {
    Arc::new(Mutex::new(GameState::new(cohort)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
