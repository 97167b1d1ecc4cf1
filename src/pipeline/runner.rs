//! Pipeline orchestrator — capture → trim → extract → classify → label.
//!
//! [`EmotionPipeline`] sequences one full invocation and maps every failure
//! into a typed [`PipelineError`], so the presentation layer decides display
//! text per error kind instead of catching a blanket exception.
//!
//! # Pipeline flow
//!
//! ```text
//! run_once()
//!   ├─ source.record_clip(3 s)          [Recording]   → Capture error
//!   ├─ trim_window(0.6 s, 2.4 s)        [Extracting]
//!   ├─ features::extract → (20, 104)?   [Extracting]  → FeatureExtraction
//!   ├─ model.get() + predict            [Classifying] → Model error (fatal)
//!   └─ Emotion::from_class_index        [Done]
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::audio::{trim_window, AudioSource, CaptureError, TrimWindow};
use crate::classifier::{ModelError, SharedModel};
use crate::config::AudioConfig;
use crate::features;
use crate::label::Emotion;

use super::state::PipelineState;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Everything that can go wrong during one pipeline invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The microphone is unavailable or stopped delivering audio.
    #[error("audio capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// The MFCC matrix did not have the trained shape — usually a clip that
    /// is too short.  Recoverable: the user records again.
    #[error("could not extract features from the recording")]
    FeatureExtraction,

    /// The classifier artifact is missing, corrupt, or rejected the input.
    /// Fatal for the application — there is no retry path.
    #[error("classifier error: {0}")]
    Model(#[from] ModelError),
}

impl PipelineError {
    /// `true` when the application should halt instead of offering a retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Model(_))
    }

    /// User-facing message, including the retry hint where one applies.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Capture(e) => format!(
                "Recording failed: {e}. Please check that your microphone is \
                 working and try again."
            ),
            PipelineError::FeatureExtraction => {
                "Could not extract features from your voice. Please try again.".into()
            }
            PipelineError::Model(e) => format!("The emotion model is unavailable: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

/// The result of one successful invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recognition {
    /// Resolved label (possibly [`Emotion::Unknown`] for an index outside
    /// the trained set — that is a defined fallback, not an error).
    pub emotion: Emotion,
    /// Raw class index the classifier returned.
    pub class_index: u32,
}

// ---------------------------------------------------------------------------
// EmotionPipeline
// ---------------------------------------------------------------------------

/// Drives one capture → classify invocation at a time.
///
/// Holds the audio source and the shared model handle behind `Arc`s so the
/// same model instance serves every invocation (and every pipeline, in a
/// hosted deployment) without reloading.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use voice_emotion::audio::AudioCapture;
/// use voice_emotion::classifier::SharedModel;
/// use voice_emotion::config::AudioConfig;
/// use voice_emotion::pipeline::EmotionPipeline;
///
/// let source = Arc::new(AudioCapture::new().unwrap());
/// let model = Arc::new(SharedModel::new("trained_model.json"));
/// let mut pipeline = EmotionPipeline::new(source, model, AudioConfig::default());
///
/// match pipeline.run_once() {
///     Ok(r) => println!("{} {}", r.emotion.icon(), r.emotion),
///     Err(e) => eprintln!("{}", e.user_message()),
/// }
/// ```
pub struct EmotionPipeline {
    source: Arc<dyn AudioSource>,
    model: Arc<SharedModel>,
    config: AudioConfig,
    state: PipelineState,
}

impl EmotionPipeline {
    /// Create a pipeline over an audio source and a shared model handle.
    pub fn new(
        source: Arc<dyn AudioSource>,
        model: Arc<SharedModel>,
        config: AudioConfig,
    ) -> Self {
        Self {
            source,
            model,
            config,
            state: PipelineState::Idle,
        }
    }

    /// Current state; `Done`/`Failed` after a finished invocation.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run one full invocation: record, trim, extract, classify, label.
    ///
    /// Blocks for the full recording duration.  Each new call restarts the
    /// state machine from the top.
    pub fn run_once(&mut self) -> Result<Recognition, PipelineError> {
        // ── 1. Record ────────────────────────────────────────────────────
        self.state = PipelineState::Recording;
        log::info!("recording {:.1} s clip", self.config.record_secs);

        let clip = self
            .source
            .record_clip(self.config.record_secs)
            .map_err(|e| self.fail(e.into()))?;

        log::debug!(
            "captured {} samples ({:.2} s) @ {} Hz",
            clip.samples.len(),
            clip.duration_secs(),
            clip.sample_rate
        );

        // ── 2. Trim + extract ────────────────────────────────────────────
        self.state = PipelineState::Extracting;

        let window = trim_window(
            &clip.samples,
            clip.sample_rate,
            TrimWindow {
                offset_secs: self.config.trim_offset_secs,
                duration_secs: self.config.trim_secs,
            },
        );

        let features = features::extract(&window, clip.sample_rate)
            .ok_or_else(|| self.fail(PipelineError::FeatureExtraction))?;

        // ── 3. Classify + label ──────────────────────────────────────────
        self.state = PipelineState::Classifying;

        let class_index = self
            .model
            .get()
            .and_then(|m| m.predict(features.as_slice()))
            .map_err(|e| self.fail(e.into()))?;

        let emotion = Emotion::from_class_index(class_index);
        if emotion == Emotion::Unknown {
            log::warn!("classifier returned untrained class index {class_index}");
        }

        self.state = PipelineState::Done;
        log::info!("detected emotion: {emotion} (class {class_index})");

        Ok(Recognition {
            emotion,
            class_index,
        })
    }

    /// Enter the `Failed` state and hand the error back to the caller.
    fn fail(&mut self, err: PipelineError) -> PipelineError {
        log::warn!("pipeline failed while {}: {err}", self.state.label());
        self.state = PipelineState::Failed;
        err
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MockAudioSource;
    use std::io::Write;

    /// Two-class artifact over the real 2080-length feature space.  Both
    /// support vectors sit far from any real MFCC vector, so the kernel row
    /// is ~0 and the positive intercept always votes for `classes[0]` = 2.
    fn happy_artifact() -> tempfile::NamedTempFile {
        let json = serde_json::json!({
            "kernel": "rbf",
            "gamma": 0.001,
            "n_features": 2080,
            "classes": [2, 5],
            "n_support": [1, 1],
            "support_vectors": [vec![0.0f32; 2080], vec![1.0f32; 2080]],
            "dual_coef": [vec![1.0f32, -1.0f32]],
            "intercepts": [0.5]
        });
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.to_string().as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn pipeline_with(
        source: MockAudioSource,
        artifact: &tempfile::NamedTempFile,
    ) -> EmotionPipeline {
        EmotionPipeline::new(
            Arc::new(source),
            Arc::new(SharedModel::new(artifact.path())),
            AudioConfig::default(),
        )
    }

    // ---- happy path --------------------------------------------------------

    #[test]
    fn sine_clip_runs_to_done_with_a_label() {
        let artifact = happy_artifact();
        let mut pipeline = pipeline_with(MockAudioSource::sine(3.0, 440.0), &artifact);
        assert_eq!(pipeline.state(), PipelineState::Idle);

        let recognition = pipeline.run_once().expect("well-formed clip must classify");

        assert_eq!(pipeline.state(), PipelineState::Done);
        assert!(pipeline.state().is_terminal());
        assert_eq!(recognition.class_index, 2);
        assert_eq!(recognition.emotion, Emotion::Happy);
        assert_eq!(recognition.emotion.icon(), "😊");
    }

    #[test]
    fn model_loads_once_across_invocations() {
        let artifact = happy_artifact();
        let model = Arc::new(SharedModel::new(artifact.path()));
        let mut pipeline = EmotionPipeline::new(
            Arc::new(MockAudioSource::sine(3.0, 440.0)),
            Arc::clone(&model),
            AudioConfig::default(),
        );

        pipeline.run_once().unwrap();
        pipeline.run_once().unwrap();
        pipeline.run_once().unwrap();

        assert_eq!(model.load_count(), 1);
    }

    // ---- failure paths -----------------------------------------------------

    #[test]
    fn short_clip_fails_feature_extraction() {
        let artifact = happy_artifact();
        // 1 s clip: the trim window is truncated, MFCC frame count != 104.
        let mut pipeline = pipeline_with(MockAudioSource::sine(1.0, 440.0), &artifact);

        let err = pipeline.run_once().unwrap_err();

        assert!(matches!(err, PipelineError::FeatureExtraction));
        assert!(!err.is_fatal());
        assert!(err.user_message().contains("try again"));
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn missing_device_fails_capture_with_retry_hint() {
        let artifact = happy_artifact();
        let mut pipeline = pipeline_with(MockAudioSource::no_device(), &artifact);

        let err = pipeline.run_once().unwrap_err();

        assert!(matches!(err, PipelineError::Capture(CaptureError::NoDevice)));
        assert!(!err.is_fatal());
        assert!(err.user_message().contains("microphone"));
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn missing_artifact_is_fatal_and_no_prediction_is_made() {
        let mut pipeline = EmotionPipeline::new(
            Arc::new(MockAudioSource::sine(3.0, 440.0)),
            Arc::new(SharedModel::new("/nonexistent/trained_model.json")),
            AudioConfig::default(),
        );

        let err = pipeline.run_once().unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Model(ModelError::NotFound(_))
        ));
        assert!(err.is_fatal());
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn failed_invocation_restarts_cleanly() {
        let artifact = happy_artifact();

        // First invocation fails on a short clip…
        let mut pipeline = pipeline_with(MockAudioSource::sine(1.0, 440.0), &artifact);
        assert!(pipeline.run_once().is_err());
        assert_eq!(pipeline.state(), PipelineState::Failed);

        // …a fresh pipeline over the same model succeeds.
        let mut pipeline = pipeline_with(MockAudioSource::sine(3.0, 440.0), &artifact);
        assert!(pipeline.run_once().is_ok());
        assert_eq!(pipeline.state(), PipelineState::Done);
    }
}
