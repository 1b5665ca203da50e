//! Error types for swing-analyzer
//!
//! Two layers:
//! - [`AnalysisError`]: what went wrong (fatal or not)
//! - [`PipelineError`]: a fatal failure, tagged with the stage it happened in
//!   and carrying every partial result gathered before the abort

use crate::models::AnalysisSession;
use crate::types::SeekError;
use swing_common::events::PipelineStage;
use thiserror::Error;

/// Analysis error kinds
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Duration is zero, negative, NaN or infinite (fatal, before sampling)
    #[error("invalid video duration: {0}")]
    InvalidDuration(f64),

    /// Analyzer configuration out of range (fatal, before sampling)
    #[error("invalid analyzer configuration: {0}")]
    InvalidConfig(String),

    /// Frame source cannot be positioned (fatal)
    #[error("seek to {time:.3}s failed: {source}")]
    Seek {
        /// Nominal sample time in seconds
        time: f64,
        /// Frame source error
        source: SeekError,
    },

    /// Seek did not finish in time; best-effort frame used (non-fatal)
    #[error("seek to {time:.3}s timed out after {timeout_ms} ms")]
    SeekTimeout {
        /// Nominal sample time in seconds
        time: f64,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// No pose could be estimated for this frame (non-fatal)
    #[error("pose unavailable at {time:.3}s: {reason}")]
    PoseUnavailable {
        /// Sample time in seconds
        time: f64,
        /// Why the pose is missing
        reason: String,
    },

    /// Run superseded by a newer run or cancelled by the caller
    #[error("analysis run {run_id} cancelled")]
    Cancelled {
        /// Cancelled run
        run_id: u64,
    },
}

impl AnalysisError {
    /// Whether this error aborts the run
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AnalysisError::SeekTimeout { .. } | AnalysisError::PoseUnavailable { .. }
        )
    }

    /// Stable error code for presentation layers
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidDuration(_) => "INVALID_DURATION",
            AnalysisError::InvalidConfig(_) => "INVALID_CONFIG",
            AnalysisError::Seek { .. } => "SEEK_FAILED",
            AnalysisError::SeekTimeout { .. } => "SEEK_TIMEOUT",
            AnalysisError::PoseUnavailable { .. } => "POSE_UNAVAILABLE",
            AnalysisError::Cancelled { .. } => "CANCELLED",
        }
    }

    /// Sample time the error refers to, if any
    pub fn time(&self) -> Option<f64> {
        match self {
            AnalysisError::Seek { time, .. }
            | AnalysisError::SeekTimeout { time, .. }
            | AnalysisError::PoseUnavailable { time, .. } => Some(*time),
            AnalysisError::InvalidDuration(_)
            | AnalysisError::InvalidConfig(_)
            | AnalysisError::Cancelled { .. } => None,
        }
    }
}

/// Fatal pipeline failure
///
/// Remaining stages were skipped. `partial` holds the session as it stood
/// when the failure happened (sample times, poses and features gathered so
/// far, warnings, status history) so nothing is silently discarded.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct PipelineError {
    /// Stage that failed
    pub stage: PipelineStage,
    /// Failure cause
    #[source]
    pub error: AnalysisError,
    /// Partial results at the time of failure
    pub partial: Box<AnalysisSession>,
}

impl PipelineError {
    /// Whether the run ended because it was cancelled or superseded
    pub fn is_cancelled(&self) -> bool {
        matches!(self.error, AnalysisError::Cancelled { .. })
    }
}
