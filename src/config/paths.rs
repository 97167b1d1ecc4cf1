//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\voice-emotion\
//!   macOS:   ~/Library/Application Support/voice-emotion/
//!   Linux:   ~/.config/voice-emotion/
//!
//! The classifier artifact is *not* under the config dir — it resolves
//! relative to the process working directory (see `ModelConfig`).

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "voice-emotion";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
    }

    #[test]
    fn settings_file_is_inside_config_dir() {
        let paths = AppPaths::new();
        assert!(paths.settings_file.starts_with(&paths.config_dir));
    }
}
