//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::AppPaths;

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for audio capture and the analysis trim window.
///
/// The defaults are the training-time parameters of the bundled artifact:
/// a 3 s recording at 22 050 Hz, analysed over a 2.4 s window that starts
/// 0.6 s in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Target sample rate in Hz for the feature stage (must be 22 050 for
    /// the bundled artifact).
    pub sample_rate: u32,
    /// Length of one recording in seconds.
    pub record_secs: f32,
    /// Seconds skipped from the start of the recording before analysis.
    pub trim_offset_secs: f32,
    /// Seconds of audio analysed after the offset.
    pub trim_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22_050,
            record_secs: 3.0,
            trim_offset_secs: 0.6,
            trim_secs: 2.4,
        }
    }
}

impl AudioConfig {
    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.sample_rate > 0, "sample_rate must be positive");
        anyhow::ensure!(self.record_secs > 0.0, "record_secs must be positive");
        anyhow::ensure!(self.trim_secs > 0.0, "trim_secs must be positive");
        anyhow::ensure!(
            self.trim_offset_secs >= 0.0,
            "trim_offset_secs must not be negative"
        );
        anyhow::ensure!(
            self.trim_offset_secs + self.trim_secs <= self.record_secs,
            "trim window ({} s + {} s) does not fit inside the {} s recording",
            self.trim_offset_secs,
            self.trim_secs,
            self.record_secs
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Settings for the classifier artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Artifact location, resolved relative to the process working directory
    /// when not absolute.
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("trained_model.json"),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub model: ModelConfig,
}

impl AppConfig {
    /// Load the configuration from the platform settings file.
    ///
    /// Returns defaults when the file does not exist (first run); errors only
    /// on unreadable or malformed files.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new())
    }

    /// Load from explicit paths (useful in tests).
    pub fn load_from(paths: &AppPaths) -> Result<Self> {
        if !paths.settings_file.exists() {
            log::debug!(
                "no settings file at {} — using defaults",
                paths.settings_file.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&paths.settings_file).with_context(|| {
            format!("failed to read {}", paths.settings_file.display())
        })?;
        let config: AppConfig = toml::from_str(&raw).with_context(|| {
            format!("failed to parse {}", paths.settings_file.display())
        })?;

        config.audio.validate()?;
        Ok(config)
    }

    /// Persist the configuration, creating the config directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new())
    }

    /// Save to explicit paths (useful in tests).
    pub fn save_to(&self, paths: &AppPaths) -> Result<()> {
        std::fs::create_dir_all(&paths.config_dir).with_context(|| {
            format!("failed to create {}", paths.config_dir.display())
        })?;

        let raw = toml::to_string_pretty(self).context("failed to serialise settings")?;
        std::fs::write(&paths.settings_file, raw).with_context(|| {
            format!("failed to write {}", paths.settings_file.display())
        })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
