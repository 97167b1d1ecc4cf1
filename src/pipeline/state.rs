//! Pipeline state machine.
//!
//! One invocation walks `Idle → Recording → Extracting → Classifying → Done`;
//! `Failed` is reachable from every non-idle state.  `Done` and `Failed` are
//! terminal per invocation — the next user action starts over at `Idle`.

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the emotion-recognition pipeline.
///
/// ```text
/// Idle ──user action──▶ Recording
///                       ──capture ok──▶ Extracting
///                                      ──features ok──▶ Classifying
///                                                      ──label ok──▶ Done
/// any non-idle state ──error──▶ Failed
/// Done / Failed ──next invocation──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Waiting for the user to start a recording.
    Idle,

    /// Microphone is live; the capture blocks for the full clip duration.
    Recording,

    /// Trimming the analysis window and computing MFCC features.
    Extracting,

    /// Running the classifier and resolving the label.
    Classifying,

    /// An emotion label was produced.  Terminal for this invocation.
    Done,

    /// A step failed.  Terminal for this invocation; the error carries the
    /// user-facing message.
    Failed,
}

impl PipelineState {
    /// Returns `true` while the pipeline is actively working on a clip.
    ///
    /// ```
    /// use voice_emotion::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Recording.is_busy());
    /// assert!(PipelineState::Extracting.is_busy());
    /// assert!(PipelineState::Classifying.is_busy());
    /// assert!(!PipelineState::Done.is_busy());
    /// assert!(!PipelineState::Failed.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PipelineState::Recording | PipelineState::Extracting | PipelineState::Classifying
        )
    }

    /// Returns `true` for the two per-invocation end states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// A short human-readable label for status display.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Recording => "Recording",
            PipelineState::Extracting => "Extracting",
            PipelineState::Classifying => "Classifying",
            PipelineState::Done => "Done",
            PipelineState::Failed => "Failed",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
