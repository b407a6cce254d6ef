//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across
//! threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::game::AgeCohort;

use super::AppPaths;

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

/// Settings for the external scoring service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Base URL of the scoring service (the client appends `/score`).
    pub base_url: String,
    /// Maximum seconds to wait for a scoring response before timing out.
    pub timeout_secs: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: "https://scoring.vocacare.app".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// FeedbackConfig
// ---------------------------------------------------------------------------

/// Settings for the coaching feedback service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Whether to request coaching feedback after each scoring round.
    pub enabled: bool,
    /// Base URL of the feedback service (the client appends `/feedback`).
    /// Empty means "same host as scoring".
    pub base_url: String,
    /// Maximum seconds to wait for a feedback response.
    pub timeout_secs: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: String::new(),
            timeout_secs: 30,
        }
    }
}

impl FeedbackConfig {
    /// The effective base URL, falling back to the scoring host.
    pub fn effective_base_url(&self, scoring: &ScoringConfig) -> String {
        if self.base_url.is_empty() {
            scoring.base_url.clone()
        } else {
            self.base_url.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for audio capture and canonicalisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Canonical sample rate in Hz; the scoring service expects 16 000.
    pub target_sample_rate: u32,
    /// Maximum recording length in seconds shown to the user.
    pub max_recording_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16_000,
            max_recording_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Settings for practice content selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameConfig {
    /// Which cohort's level table to use.
    pub age_cohort: AgeCohort,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voca_speech::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Scoring service settings.
    pub scoring: ScoringConfig,
    /// Feedback service settings.
    pub feedback: FeedbackConfig,
    /// Audio capture / canonicalisation settings.
    pub audio: AudioConfig,
    /// Practice content settings.
    pub game: GameConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
