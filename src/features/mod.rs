//! Feature extraction — trimmed waveform → MFCC matrix → flat feature vector.
//!
//! # Pipeline
//!
//! ```text
//! trimmed samples (2.4 s @ 22 050 Hz)
//!     → compute_mfcc (STFT → mel filterbank → dB → DCT-II)
//!     → shape check: must be exactly (20, 104)
//!     → flatten row-major → FeatureVector (len 2080)
//! ```
//!
//! The shape check is a **soft failure**: [`extract`] returns `None` instead
//! of erroring, and the orchestrator turns that into a user-facing "could not
//! extract features" message.  The flattening order is row-major because the
//! classifier artifact was trained on row-major-flattened matrices — a
//! mismatch there would not fail, it would silently misclassify.

pub mod mfcc;
pub mod vector;

pub use mfcc::{compute_mfcc, MfccConfig};
pub use vector::{extract, FeatureVector, EXPECTED_COEFFS, EXPECTED_FRAMES, FEATURE_LEN};
