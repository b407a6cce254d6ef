//! Practice-round orchestration.
//!
//! [`GamePipeline`] ties the subsystems together: it drives the recording
//! session, submits canonical audio for scoring, applies the correctness
//! verdict to progression, and publishes everything through [`SharedState`]
//! for a front end to render.

pub mod runner;
pub mod state;

pub use runner::{GamePipeline, PipelineCommand};
pub use state::{new_shared_state, GameState, SharedState};
