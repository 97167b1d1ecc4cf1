//! Configuration — TOML settings and cross-platform paths.
//!
//! Provides [`AppConfig`] (audio + model settings), [`AppPaths`] for the
//! settings location, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.  The capture and trim parameters default to the values
//! the classifier artifact was trained with; changing them is possible but
//! the model will only see the shape it expects with the defaults.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, ModelConfig};
