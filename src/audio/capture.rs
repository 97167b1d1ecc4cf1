//! Microphone capture via `cpal`.
//!
//! [`AudioCapture`] wraps the cpal host/device/stream lifecycle.  Call
//! [`AudioCapture::record_clip`] for a blocking fixed-duration recording —
//! it streams [`AudioChunk`]s from the cpal callback over an mpsc channel,
//! collects until the requested duration has arrived, then drops the RAII
//! [`StreamHandle`] to stop the hardware stream.
//!
//! The returned [`RecordedClip`] is always **22 050 Hz mono f32**, whatever
//! the device's native format is.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;
use std::time::Duration;
use thiserror::Error;

use super::resample::{resample_to_22_05k, stereo_to_mono};
use super::TARGET_SAMPLE_RATE;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// A single buffer of raw audio as delivered by the cpal callback.
///
/// Samples are interleaved `f32` in the range `[-1.0, 1.0]` at the device's
/// native rate and channel count.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Interleaved PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate of this chunk in Hz (e.g. 44100, 48000).
    pub sample_rate: u32,
    /// Number of interleaved channels (1 = mono, 2 = stereo, …).
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// RecordedClip
// ---------------------------------------------------------------------------

/// A finished fixed-duration recording, converted for the feature stage.
///
/// Immutable once returned: the pipeline consumes it by trimming and feature
/// extraction, never by mutation.
#[derive(Debug, Clone)]
pub struct RecordedClip {
    /// Mono PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Always [`TARGET_SAMPLE_RATE`] (22 050 Hz).
    pub sample_rate: u32,
}

impl RecordedClip {
    /// Length of the clip in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// Dropping this value stops the underlying hardware stream.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running the audio capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// The device stopped delivering audio before the requested duration was
    /// captured (unplugged mid-recording, driver stall, …).
    #[error("audio device stalled after {got:.2} s of a {wanted:.2} s recording")]
    Stalled { got: f32, wanted: f32 },
}

// ---------------------------------------------------------------------------
// AudioSource trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe source of fixed-duration recordings.
///
/// The pipeline holds an `Arc<dyn AudioSource>` so tests can substitute a
/// synthetic clip for the live microphone.
///
/// # Contract
///
/// - The call blocks for at least `duration_secs` (live capture cannot
///   complete faster than real time).
/// - The returned clip is 22 050 Hz mono f32.
pub trait AudioSource: Send + Sync {
    /// Record `duration_secs` of audio from this source.
    fn record_clip(&self, duration_secs: f32) -> Result<RecordedClip, CaptureError>;
}

// Compile-time assertion: Box<dyn AudioSource> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioSource>) {}
};

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// Grace period past the nominal duration before a silent device is treated
/// as stalled.
const STALL_GRACE: Duration = Duration::from_secs(2);

/// Microphone capture wrapper built on top of `cpal`.
///
/// # Example
///
/// ```rust,no_run
/// use voice_emotion::audio::{AudioCapture, AudioSource};
///
/// let capture = AudioCapture::new().unwrap();
/// let clip = capture.record_clip(3.0).unwrap(); // blocks for 3 s
/// assert_eq!(clip.sample_rate, 22_050);
/// ```
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    /// Native sample rate reported by the device (Hz).
    sample_rate: u32,
    /// Number of interleaved channels reported by the device.
    channels: u16,
}

impl AudioCapture {
    /// Create a new [`AudioCapture`] using the system default input device.
    ///
    /// Queries the device's preferred stream configuration (sample rate,
    /// channels, buffer size) so no manual configuration is required.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoDevice`] when no input device is available,
    /// or [`CaptureError::DefaultConfig`] when the device cannot report a
    /// default stream configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start streaming and send [`AudioChunk`]s to `tx`.
    ///
    /// The cpal callback runs on a dedicated audio thread; send errors
    /// (receiver dropped) are silently ignored so that thread never panics.
    fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<StreamHandle, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let chunk = AudioChunk {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                };
                // Ignore send errors; the receiver may have been dropped.
                let _ = tx.send(chunk);
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None, // no timeout
        )?;

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }

    /// Native sample rate of the capture stream in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels in each [`AudioChunk`].
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl AudioSource for AudioCapture {
    /// Record `duration_secs` from the microphone, blocking until done.
    ///
    /// Collects interleaved samples at the device rate until the requested
    /// duration has arrived, stops the stream, then downmixes to mono and
    /// resamples to 22 050 Hz.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::BuildStream`] / [`CaptureError::PlayStream`] when
    ///   the platform rejects the stream configuration.
    /// - [`CaptureError::Stalled`] when the device goes quiet for more than
    ///   [`STALL_GRACE`] before the duration is reached.
    fn record_clip(&self, duration_secs: f32) -> Result<RecordedClip, CaptureError> {
        let (tx, rx) = mpsc::channel::<AudioChunk>();
        let handle = self.start(tx)?;

        let frames_wanted = (duration_secs as f64 * self.sample_rate as f64).ceil() as usize;
        let samples_wanted = frames_wanted * self.channels as usize;
        let mut raw: Vec<f32> = Vec::with_capacity(samples_wanted);

        log::debug!(
            "recording {duration_secs:.1} s ({frames_wanted} frames @ {} Hz, {} ch)",
            self.sample_rate,
            self.channels
        );

        while raw.len() < samples_wanted {
            match rx.recv_timeout(STALL_GRACE) {
                Ok(chunk) => raw.extend_from_slice(&chunk.samples),
                Err(_) => {
                    let got =
                        raw.len() as f32 / (self.sample_rate as f32 * self.channels as f32);
                    return Err(CaptureError::Stalled {
                        got,
                        wanted: duration_secs,
                    });
                }
            }
        }

        // Stop the hardware stream before the (cheap) conversion work.
        drop(handle);

        raw.truncate(samples_wanted);
        let mono = stereo_to_mono(&raw, self.channels);
        let samples = resample_to_22_05k(&mono, self.sample_rate);

        Ok(RecordedClip {
            samples,
            sample_rate: TARGET_SAMPLE_RATE,
        })
    }
}

// ---------------------------------------------------------------------------
// MockAudioSource  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured clip (or error) without
/// touching any audio hardware.
#[cfg(test)]
pub struct MockAudioSource {
    response: Result<RecordedClip, MockFailure>,
}

/// `CaptureError` is not `Clone`, so the mock stores which failure to build.
#[cfg(test)]
#[derive(Clone, Copy)]
enum MockFailure {
    NoDevice,
}

#[cfg(test)]
impl MockAudioSource {
    /// Mock that returns the given samples as a 22 050 Hz mono clip.
    pub fn with_samples(samples: Vec<f32>) -> Self {
        Self {
            response: Ok(RecordedClip {
                samples,
                sample_rate: TARGET_SAMPLE_RATE,
            }),
        }
    }

    /// Mock that returns a `duration_secs`-long sine wave at `freq_hz`.
    pub fn sine(duration_secs: f32, freq_hz: f32) -> Self {
        let n = (duration_secs * TARGET_SAMPLE_RATE as f32) as usize;
        let samples = (0..n)
            .map(|i| {
                let t = i as f32 / TARGET_SAMPLE_RATE as f32;
                (2.0 * std::f32::consts::PI * freq_hz * t).sin() * 0.5
            })
            .collect();
        Self::with_samples(samples)
    }

    /// Mock that always fails with [`CaptureError::NoDevice`].
    pub fn no_device() -> Self {
        Self {
            response: Err(MockFailure::NoDevice),
        }
    }
}

#[cfg(test)]
impl AudioSource for MockAudioSource {
    fn record_clip(&self, _duration_secs: f32) -> Result<RecordedClip, CaptureError> {
        match &self.response {
            Ok(clip) => Ok(clip.clone()),
            Err(MockFailure::NoDevice) => Err(CaptureError::NoDevice),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
