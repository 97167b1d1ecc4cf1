//! Label mapping — classifier class index → emotion name + display icon.
//!
//! A closed, static mapping over the 8 classes the artifact was trained on.
//! [`Emotion::from_class_index`] is total: anything outside `0..=7` resolves
//! to [`Emotion::Unknown`] ("unknown" / ❓) rather than erroring.

pub mod emotion;

pub use emotion::Emotion;
