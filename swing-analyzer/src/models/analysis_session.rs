//! Analysis run state machine
//!
//! A session progresses `Idle → Sampling → DetectingPoses → Segmenting → Done`.
//! `Error` and `Cancelled` are terminal as well. Partial results accumulate on
//! the session as stages run, so a failed run still reports what it gathered.

use crate::error::AnalysisError;
use crate::models::{FeatureVector, LabeledFrame, PhaseSegmentation, Pose, SegmentIndices};
use crate::workflow::RunId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swing_common::events::{AnalysisStatus, PipelineStage};
use uuid::Uuid;

/// Status transition record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransition {
    pub session_id: Uuid,
    pub run_id: RunId,
    pub old_status: AnalysisStatus,
    pub new_status: AnalysisStatus,
    pub transitioned_at: DateTime<Utc>,
}

/// Pose observation at one sample time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSample {
    /// Nominal sample time in seconds
    pub time: f64,
    /// Detected pose (`None` when no person was found or the frame was missing)
    pub pose: Option<Pose>,
}

/// Non-fatal degradation recorded during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisWarning {
    pub stage: PipelineStage,
    /// Error code (e.g. "SEEK_TIMEOUT")
    pub code: String,
    pub message: String,
    /// Sample time the warning refers to
    pub time: Option<f64>,
}

impl AnalysisWarning {
    pub fn from_error(stage: PipelineStage, error: &AnalysisError) -> Self {
        Self {
            stage,
            code: error.code().to_string(),
            message: error.to_string(),
            time: error.time(),
        }
    }
}

/// One analysis run (in-memory state)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSession {
    /// Unique session identifier
    pub session_id: Uuid,

    /// Monotonic run identifier
    pub run_id: RunId,

    /// Current status
    pub status: AnalysisStatus,

    /// Video duration in seconds
    pub duration: f64,

    /// Requested number of samples
    pub sample_count: usize,

    /// Sample times acquired so far
    pub sample_times: Vec<f64>,

    /// Pose observations so far
    pub samples: Vec<FrameSample>,

    /// Feature series so far
    pub features: Vec<FeatureVector>,

    /// Accumulated non-fatal warnings
    pub warnings: Vec<AnalysisWarning>,

    /// Status history
    pub transitions: Vec<StatusTransition>,

    /// Run start time
    pub started_at: DateTime<Utc>,

    /// Run end time (set on terminal status)
    pub ended_at: Option<DateTime<Utc>>,
}

impl AnalysisSession {
    /// Create a new idle session
    pub fn new(run_id: RunId, duration: f64, sample_count: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            run_id,
            status: AnalysisStatus::Idle,
            duration,
            sample_count,
            sample_times: Vec::new(),
            samples: Vec::new(),
            features: Vec::new(),
            warnings: Vec::new(),
            transitions: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Transition to a new status
    pub fn transition_to(&mut self, new_status: AnalysisStatus) -> StatusTransition {
        let transition = StatusTransition {
            session_id: self.session_id,
            run_id: self.run_id,
            old_status: self.status,
            new_status,
            transitioned_at: Utc::now(),
        };
        self.status = new_status;

        if new_status.is_terminal() {
            self.ended_at = Some(transition.transitioned_at);
        }

        self.transitions.push(transition.clone());
        transition
    }

    /// Record a non-fatal warning
    pub fn add_warning(&mut self, warning: AnalysisWarning) {
        self.warnings.push(warning);
    }

    /// Statuses visited, starting from `Idle`
    pub fn status_history(&self) -> Vec<AnalysisStatus> {
        std::iter::once(AnalysisStatus::Idle)
            .chain(self.transitions.iter().map(|t| t.new_status))
            .collect()
    }

    /// Check if session is terminal (finished)
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Final session state (status `Done`)
    pub session: AnalysisSession,
    /// One labeled frame per feature vector, in time order
    pub labeled_frames: Vec<LabeledFrame>,
    /// Phase markers (empty when no frames were sampled)
    pub segmentation: PhaseSegmentation,
    /// Resolved boundary indices (`None` when no frames were sampled)
    pub indices: Option<SegmentIndices>,
}
