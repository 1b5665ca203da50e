//! Analysis workflow type definitions
//!
//! Supporting types for swing analysis progress tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analysis run status
///
/// Runs progress `Idle → Sampling → DetectingPoses → Segmenting → Done`;
/// `Error` and `Cancelled` are the other terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    /// Run created, no stage started
    Idle,
    /// Seeking the frame source at each sample time
    Sampling,
    /// Running the pose estimator and extracting features
    DetectingPoses,
    /// Labeling the feature series with swing phases
    Segmenting,
    /// Run finished successfully
    Done,
    /// Run aborted by a fatal stage failure
    Error,
    /// Run superseded or cancelled by the caller
    Cancelled,
}

impl AnalysisStatus {
    /// Whether the run can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisStatus::Done | AnalysisStatus::Error | AnalysisStatus::Cancelled
        )
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisStatus::Idle => "idle",
            AnalysisStatus::Sampling => "sampling",
            AnalysisStatus::DetectingPoses => "detecting poses",
            AnalysisStatus::Segmenting => "segmenting",
            AnalysisStatus::Done => "done",
            AnalysisStatus::Error => "error",
            AnalysisStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Pipeline stage names used in warnings and failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    /// Argument validation before any stage runs
    Validation,
    /// Frame acquisition
    Sampling,
    /// Pose estimation and feature extraction
    PoseDetection,
    /// Phase segmentation
    Segmentation,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::Validation => "validation",
            PipelineStage::Sampling => "frame sampling",
            PipelineStage::PoseDetection => "pose detection",
            PipelineStage::Segmentation => "phase segmentation",
        };
        f.write_str(s)
    }
}

/// Phase boundary as carried in events (phase name + representative time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMarkerInfo {
    /// Phase name (e.g. "Top", "Impact")
    pub phase: String,
    /// Representative time in seconds
    pub time: f64,
}
