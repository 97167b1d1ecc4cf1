//! Audio resampling and channel mixing utilities.
//!
//! The feature extractor requires **22 050 Hz mono `f32`** audio — the rate
//! the classifier artifact was trained at.  This module provides the two
//! conversion steps:
//!
//! 1. [`stereo_to_mono`] — downmix any number of interleaved channels to mono.
//! 2. [`resample_to_22_05k`] — resample from the device rate to 22 050 Hz.
//!
//! The resampler uses linear interpolation, which is plenty for a 3-second
//! clip feeding a 128-band mel filterbank.

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all channels.
///
/// The output length is `samples.len() / channels`.
///
/// * If `channels == 1` the input slice is returned as an owned `Vec` with no
///   averaging (fast path — avoids an extra pass when already mono).
/// * If `channels == 0` an empty vector is returned.
///
/// # Example
///
/// ```rust
/// use voice_emotion::audio::stereo_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// assert!((mono[1] - 0.0).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample_to_22_05k
// ---------------------------------------------------------------------------

/// Resample `samples` from `source_rate` Hz to 22 050 Hz using linear
/// interpolation.
///
/// * If `source_rate` is already `22_050` the input is cloned and returned
///   unchanged (no-op fast path).
/// * If `samples` is empty an empty vector is returned.
///
/// The output length is approximately
/// `samples.len() * 22_050 / source_rate`.
///
/// # Example
///
/// ```rust
/// use voice_emotion::audio::resample_to_22_05k;
///
/// // Already 22.05 kHz — no-op
/// let mono = vec![0.1_f32; 220];
/// let out = resample_to_22_05k(&mono, 22_050);
/// assert_eq!(out.len(), mono.len());
///
/// // Downsample from 44.1 kHz (ratio = 1/2)
/// let hi = vec![0.5_f32; 440];
/// let lo = resample_to_22_05k(&hi, 44_100);
/// assert_eq!(lo.len(), 220);
/// ```
pub fn resample_to_22_05k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    const TARGET_RATE: u32 = 22_050;

    if source_rate == TARGET_RATE {
        return samples.to_vec();
    }

    if samples.is_empty() {
        return Vec::new();
    }

    let ratio = TARGET_RATE as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            // Linear interpolation between adjacent samples
            samples[idx] * (1.0 - frac as f32) + samples[idx + 1] * frac as f32
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
