//! Pipeline orchestration — state machine + invocation runner.
//!
//! # Architecture
//!
//! ```text
//! user action
//!      │
//!      ▼
//! EmotionPipeline::run_once()
//!      ├─ AudioSource::record_clip      [Recording]
//!      ├─ trim_window + features::extract [Extracting]
//!      ├─ SharedModel::get + predict    [Classifying]
//!      └─ Emotion::from_class_index     [Done]
//!
//! any failing step → PipelineState::Failed + typed PipelineError
//! ```
//!
//! One logical flow per invocation, no internal parallelism — the only
//! blocking point is the live capture, which cannot complete faster than
//! real time.

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{EmotionPipeline, PipelineError, Recognition};
pub use state::PipelineState;
