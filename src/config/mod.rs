//! Application configuration: TOML settings file + platform paths.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, FeedbackConfig, GameConfig, ScoringConfig};
