//! MFCC computation — Hann-windowed STFT, mel filterbank, log power, DCT-II.

use ndarray::Array2;
use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;

// ---------------------------------------------------------------------------
// MfccConfig
// ---------------------------------------------------------------------------

/// MFCC framing parameters.
///
/// The defaults are the exact parameters the classifier artifact was trained
/// with.  They are correctness-critical: a different hop length or FFT size
/// changes the frame count and coefficient values, which does not error —
/// it silently produces wrong predictions.
pub struct MfccConfig {
    pub sample_rate: u32,
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub n_mfcc: usize,
    pub fmin: f32,
    pub fmax: f32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22_050,
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            n_mfcc: 20,
            fmin: 0.0,
            fmax: 11_025.0, // sample_rate / 2
        }
    }
}

impl MfccConfig {
    /// Config matching the training parameters at a given sample rate.
    pub fn for_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            fmax: sample_rate as f32 / 2.0,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// compute_mfcc
// ---------------------------------------------------------------------------

/// Compute the MFCC matrix of `samples`, shape `(n_mfcc, frames)`.
///
/// The signal is zero-padded by `n_fft / 2` on both sides so frames are
/// centred on their hop positions; the frame count for an input of `n`
/// samples is therefore `n / hop_length + 1`.  A 2.4 s window at 22 050 Hz
/// (52 920 samples) yields 104 frames.
pub fn compute_mfcc(samples: &[f32], config: &MfccConfig) -> Array2<f32> {
    let n_fft = config.n_fft;
    let hop_length = config.hop_length;
    let n_mels = config.n_mels;
    let n_mfcc = config.n_mfcc;

    // Create Hann window
    let window: Vec<f32> = (0..n_fft)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / n_fft as f32).cos()))
        .collect();

    // Pad signal so frames are centred
    let pad_length = n_fft / 2;
    let mut padded = vec![0.0f32; pad_length];
    padded.extend_from_slice(samples);
    padded.extend(vec![0.0f32; pad_length]);

    if padded.len() < n_fft {
        return Array2::zeros((n_mfcc, 0));
    }

    // Compute STFT power spectrum
    let num_frames = (padded.len() - n_fft) / hop_length + 1;
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let mut spectrogram = Array2::<f32>::zeros((n_fft / 2 + 1, num_frames));

    for (frame_idx, start) in (0..padded.len() - n_fft + 1)
        .step_by(hop_length)
        .enumerate()
    {
        if frame_idx >= num_frames {
            break;
        }

        // Apply window and create complex buffer
        let mut buffer: Vec<Complex<f32>> = padded[start..start + n_fft]
            .iter()
            .zip(window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();

        fft.process(&mut buffer);

        // Power spectrum
        for (i, c) in buffer.iter().take(n_fft / 2 + 1).enumerate() {
            spectrogram[[i, frame_idx]] = c.norm_sqr();
        }
    }

    // Mel filterbank → log power (dB) → DCT-II
    let mel_filterbank = create_mel_filterbank(
        config.sample_rate,
        n_fft,
        n_mels,
        config.fmin,
        config.fmax,
    );

    let mel_spec = mel_filterbank.dot(&spectrogram);
    let log_mel = mel_spec.mapv(|x| 10.0 * x.max(1e-10).log10());

    dct_ii(&log_mel, n_mfcc)
}

/// Convert frequency to mel scale
fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mel to frequency
fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Create mel filterbank matrix, shape `(n_mels, n_fft / 2 + 1)`.
fn create_mel_filterbank(
    sample_rate: u32,
    n_fft: usize,
    n_mels: usize,
    fmin: f32,
    fmax: f32,
) -> Array2<f32> {
    let n_freqs = n_fft / 2 + 1;

    // Mel points, evenly spaced between fmin and fmax on the mel scale
    let mel_min = hz_to_mel(fmin);
    let mel_max = hz_to_mel(fmax);

    let mel_points: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_min + (mel_max - mel_min) * i as f32 / (n_mels + 1) as f32)
        .collect();

    let hz_points: Vec<f32> = mel_points.iter().map(|&m| mel_to_hz(m)).collect();

    let bin_points: Vec<usize> = hz_points
        .iter()
        .map(|&hz| ((n_fft + 1) as f32 * hz / sample_rate as f32).floor() as usize)
        .collect();

    let mut filterbank = Array2::<f32>::zeros((n_mels, n_freqs));

    for m in 0..n_mels {
        let f_m_minus = bin_points[m];
        let f_m = bin_points[m + 1];
        let f_m_plus = bin_points[m + 2];

        // Rising slope
        for k in f_m_minus..f_m {
            if k < n_freqs {
                filterbank[[m, k]] = (k - f_m_minus) as f32 / (f_m - f_m_minus).max(1) as f32;
            }
        }

        // Falling slope
        for k in f_m..f_m_plus {
            if k < n_freqs {
                filterbank[[m, k]] = (f_m_plus - k) as f32 / (f_m_plus - f_m).max(1) as f32;
            }
        }
    }

    filterbank
}

/// Orthonormal DCT-II along the mel axis, keeping the first `n_mfcc` rows.
///
/// Input shape `(n_mels, frames)`, output shape `(n_mfcc, frames)`.
fn dct_ii(log_mel: &Array2<f32>, n_mfcc: usize) -> Array2<f32> {
    let (n_mels, num_frames) = log_mel.dim();
    let mut out = Array2::<f32>::zeros((n_mfcc, num_frames));

    if n_mels == 0 {
        return out;
    }

    let scale0 = (1.0 / n_mels as f32).sqrt();
    let scale = (2.0 / n_mels as f32).sqrt();

    for k in 0..n_mfcc {
        let s = if k == 0 { scale0 } else { scale };
        for t in 0..num_frames {
            let mut acc = 0.0f32;
            for n in 0..n_mels {
                acc += log_mel[[n, t]]
                    * (PI * k as f32 * (2 * n + 1) as f32 / (2 * n_mels) as f32).cos();
            }
            out[[k, t]] = s * acc;
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
