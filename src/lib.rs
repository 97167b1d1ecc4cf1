//! Voice Emotion Recognition — record a short clip, extract MFCC features,
//! classify the speaker's emotion with a pre-trained SVM.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → AudioCapture (3 s, 22 050 Hz mono f32)
//!           → trim_window (0.6 s offset, 2.4 s window)
//!           → features::extract (MFCC 20×104 → flat 2080)
//!           → SvmModel::predict (one-vs-one RBF SVC)
//!           → Emotion (label + icon)
//! ```
//!
//! The [`pipeline::EmotionPipeline`] orchestrator sequences these stages and
//! maps every failure into a typed [`pipeline::PipelineError`].  The
//! classifier artifact is loaded at most once per process through
//! [`classifier::SharedModel`] and shared read-only afterwards.

pub mod audio;
pub mod classifier;
pub mod config;
pub mod features;
pub mod label;
pub mod pipeline;
