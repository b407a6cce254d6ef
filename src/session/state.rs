//! Recording session state machine.
//!
//! ```text
//! Idle ──start()──▶ Requesting ──stream acquired──▶ Recording
//!                       │                              │
//!                       └─permission denied─▶ Idle     │ stop()
//!                                                      ▼
//!                                  Stopping ──▶ Converting ──▶ Complete
//!                                                      │
//!                                                      └─decode failed─▶ Failed
//! any state ──cancel()──▶ Idle
//! ```
//!
//! The UI reads this to decide which controls to enable; only `Idle`
//! accepts a new `start()`.

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// States of a microphone recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session active; `start()` is accepted.
    Idle,

    /// Waiting for the platform to hand over the input device.
    Requesting,

    /// Stream is open; chunks are being buffered.
    Recording,

    /// Stop requested; the stream is being released.
    Stopping,

    /// Buffered chunks are being decoded, resampled, and encoded.
    Converting,

    /// A canonical asset was produced.
    Complete,

    /// The captured audio could not be decoded.
    Failed,
}

impl SessionState {
    /// Returns `true` while a session is in progress and a new `start()`
    /// must be rejected.
    ///
    /// ```
    /// use voca_speech::session::SessionState;
    ///
    /// assert!(!SessionState::Idle.is_busy());
    /// assert!(SessionState::Requesting.is_busy());
    /// assert!(SessionState::Recording.is_busy());
    /// assert!(SessionState::Converting.is_busy());
    /// assert!(!SessionState::Complete.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionState::Requesting
                | SessionState::Recording
                | SessionState::Stopping
                | SessionState::Converting
        )
    }

    /// Short human-readable label for a status display.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Requesting => "Requesting microphone",
            SessionState::Recording => "Recording",
            SessionState::Stopping => "Stopping",
            SessionState::Converting => "Converting",
            SessionState::Complete => "Done",
            SessionState::Failed => "Failed",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
