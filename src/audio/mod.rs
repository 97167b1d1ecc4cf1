//! Audio input — microphone capture → downmix/resample → trim window.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → stereo_to_mono
//!           → resample_to_22_05k → RecordedClip → trim_window
//! ```
//!
//! The feature extractor (and the trained artifact) expect **22 050 Hz mono
//! `f32`** audio, so [`AudioCapture::record_clip`] converts whatever the
//! device delivers before returning.  [`trim_window`] then cuts the analysis
//! window (0.6 s offset, 2.4 s duration) directly out of the in-memory
//! buffer — no intermediate WAV encode/decode round trip.

pub mod capture;
pub mod resample;
pub mod trim;

pub use capture::{
    AudioCapture, AudioChunk, AudioSource, CaptureError, RecordedClip, StreamHandle,
};
pub use resample::{resample_to_22_05k, stereo_to_mono};
pub use trim::{trim_window, TrimWindow};

// test-only re-export so the pipeline test module can import MockAudioSource
// without `use voice_emotion::audio::capture::MockAudioSource`.
#[cfg(test)]
pub use capture::MockAudioSource;

/// Sample rate the feature stage expects, in Hz.
pub const TARGET_SAMPLE_RATE: u32 = 22_050;
