//! Microphone recording session lifecycle.
//!
//! [`RecordingSession`] drives the state machine in [`SessionState`]:
//! start, stop-and-convert, cancel.  Capture hardware and raw-asset decoding
//! are injected traits, so the controller runs identically under tests and
//! in production.

pub mod controller;
pub mod state;

pub use controller::{RecordingSession, SessionError};
pub use state::SessionState;
