//! Platform-appropriate application paths.

use std::path::PathBuf;

/// Resolved filesystem locations for configuration.
///
/// Uses the platform config directory (`~/.config/voca-speech` on Linux,
/// `%APPDATA%` on Windows, `~/Library/Application Support` on macOS),
/// falling back to the current directory when the platform reports none.
pub struct AppPaths {
    /// Directory holding all app configuration.
    pub config_dir: PathBuf,
    /// The `settings.toml` file.
    pub settings_file: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voca-speech");
        let settings_file = config_dir.join("settings.toml");
        Self {
            config_dir,
            settings_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
