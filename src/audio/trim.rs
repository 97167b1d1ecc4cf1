//! Analysis-window trimming.
//!
//! The classifier was trained on a **2.4 s window starting 0.6 s into the
//! clip** — the head of a recording is mostly button-press noise and breath.
//! [`trim_window`] cuts that window directly out of the in-memory sample
//! buffer.
//!
//! ## Short-input policy
//!
//! When the buffer ends before the window does, the result is **truncated to
//! the available samples** — never zero-padded.  A short window produces an
//! MFCC matrix with too few frames, which the feature stage rejects with its
//! shape check, so silence is never silently invented.

// ---------------------------------------------------------------------------
// TrimWindow
// ---------------------------------------------------------------------------

/// Offset + duration of the analysis window, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    /// Seconds skipped from the start of the recording.
    pub offset_secs: f32,
    /// Seconds kept after the offset.
    pub duration_secs: f32,
}

impl TrimWindow {
    /// The window the classifier artifact was trained with.
    pub const TRAINING: TrimWindow = TrimWindow {
        offset_secs: 0.6,
        duration_secs: 2.4,
    };

    /// Number of samples the full window spans at `sample_rate` Hz.
    ///
    /// At 22 050 Hz the training window is 52 920 samples.
    pub fn len_samples(&self, sample_rate: u32) -> usize {
        (self.duration_secs as f64 * sample_rate as f64) as usize
    }
}

impl Default for TrimWindow {
    fn default() -> Self {
        Self::TRAINING
    }
}

// ---------------------------------------------------------------------------
// trim_window
// ---------------------------------------------------------------------------

/// Slice the analysis window out of `samples`.
///
/// The window covers sample indices
/// `[offset_secs * sample_rate, (offset_secs + duration_secs) * sample_rate)`.
///
/// * Input long enough → exactly `window.len_samples(sample_rate)` samples.
/// * Input ends inside the window → truncated to the available samples.
/// * Offset beyond the end of the input → empty vector.
///
/// # Example
///
/// ```rust
/// use voice_emotion::audio::{trim_window, TrimWindow};
///
/// let clip = vec![0.0_f32; 3 * 22_050]; // 3 s at 22.05 kHz
/// let window = trim_window(&clip, 22_050, TrimWindow::TRAINING);
/// assert_eq!(window.len(), 52_920); // 2.4 s
/// ```
pub fn trim_window(samples: &[f32], sample_rate: u32, window: TrimWindow) -> Vec<f32> {
    let start = (window.offset_secs as f64 * sample_rate as f64) as usize;
    let end = start + window.len_samples(sample_rate);

    if start >= samples.len() {
        return Vec::new();
    }

    samples[start..end.min(samples.len())].to_vec()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 22_050;

    #[test]
    fn full_clip_yields_exact_window_length() {
        let clip = vec![0.0_f32; 3 * SR as usize]; // 66 150 samples
        let out = trim_window(&clip, SR, TrimWindow::TRAINING);
        assert_eq!(out.len(), 52_920); // 2.4 s * 22 050 Hz
    }

    #[test]
    fn window_starts_at_offset() {
        // Mark the first sample after the 0.6 s offset so we can find it.
        let mut clip = vec![0.0_f32; 3 * SR as usize];
        let start = (0.6 * SR as f32) as usize; // 13 230
        clip[start] = 1.0;

        let out = trim_window(&clip, SR, TrimWindow::TRAINING);
        assert!((out[0] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn short_input_is_truncated_not_padded() {
        // 2 s clip: window would run 0.6 s → 3.0 s, only 1.4 s available.
        let clip = vec![0.25_f32; 2 * SR as usize];
        let out = trim_window(&clip, SR, TrimWindow::TRAINING);

        let start = (0.6 * SR as f32) as usize;
        assert_eq!(out.len(), clip.len() - start);
        // Truncation must not introduce synthetic silence.
        assert!(out.iter().all(|&s| (s - 0.25).abs() < f32::EPSILON));
    }

    #[test]
    fn offset_past_end_yields_empty() {
        let clip = vec![0.0_f32; (0.5 * SR as f32) as usize]; // 0.5 s < 0.6 s offset
        let out = trim_window(&clip, SR, TrimWindow::TRAINING);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_input_yields_empty() {
        let out = trim_window(&[], SR, TrimWindow::TRAINING);
        assert!(out.is_empty());
    }

    #[test]
    fn training_window_sample_count() {
        assert_eq!(TrimWindow::TRAINING.len_samples(SR), 52_920);
    }

    #[test]
    fn default_window_is_training_window() {
        assert_eq!(TrimWindow::default(), TrimWindow::TRAINING);
    }
}
