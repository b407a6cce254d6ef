//! Gamified practice content and progression.

pub mod content;
pub mod progression;

pub use content::{AgeCohort, Level, ADULTS_LEVELS, KIDS_LEVELS, TEENS_LEVELS};
pub use progression::{Advance, ProgressionState};
