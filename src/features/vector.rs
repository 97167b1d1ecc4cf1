//! Fixed-shape feature vector and the extract step.

use ndarray::Array2;

use super::mfcc::{compute_mfcc, MfccConfig};

/// Number of MFCC coefficients the artifact was trained on.
pub const EXPECTED_COEFFS: usize = 20;
/// Number of time frames the artifact was trained on (2.4 s window).
pub const EXPECTED_FRAMES: usize = 104;
/// Flattened feature length: 20 × 104.
pub const FEATURE_LEN: usize = EXPECTED_COEFFS * EXPECTED_FRAMES;

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// A row-major-flattened MFCC matrix of length [`FEATURE_LEN`].
///
/// Only [`extract`] constructs this type, so holding one is proof that the
/// shape check passed — the classifier can trust the length.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    /// The flattened coefficients.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Always [`FEATURE_LEN`].
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// extract
// ---------------------------------------------------------------------------

/// Extract the classifier's feature vector from a trimmed waveform.
///
/// Computes the MFCC matrix with the training parameters, validates the
/// shape is exactly (20, 104), and flattens row-major (coefficient-major:
/// all 104 frames of coefficient 0, then coefficient 1, …) — the order the
/// classifier was trained on.
///
/// Returns `None` when the shape check fails (input too short or long, wrong
/// sample rate).  This is a deliberate soft-failure path: the orchestrator
/// reports it as "could not extract features" and the user retries.
pub fn extract(samples: &[f32], sample_rate: u32) -> Option<FeatureVector> {
    let config = MfccConfig::for_sample_rate(sample_rate);
    let mfcc = compute_mfcc(samples, &config);

    if mfcc.dim() != (EXPECTED_COEFFS, EXPECTED_FRAMES) {
        log::warn!(
            "MFCC shape {:?} != ({EXPECTED_COEFFS}, {EXPECTED_FRAMES}) — rejecting features",
            mfcc.dim()
        );
        return None;
    }

    Some(FeatureVector(flatten_row_major(&mfcc)))
}

/// Flatten `(coeffs, frames)` row by row into a single `Vec`.
fn flatten_row_major(matrix: &Array2<f32>) -> Vec<f32> {
    let mut out = Vec::with_capacity(matrix.len());
    for row in matrix.rows() {
        out.extend(row.iter().copied());
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
