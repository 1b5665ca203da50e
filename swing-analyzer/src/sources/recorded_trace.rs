//! Recorded keypoint trace replay
//!
//! A trace is the output of an earlier pose estimation pass, stored as JSON:
//!
//! ```json
//! {
//!   "duration": 2.4,
//!   "frames": [
//!     { "time": 0.0, "keypoints": [ { "name": "left_shoulder", "x": 0.41, "y": 0.32, "confidence": 0.93 } ] },
//!     { "time": 0.04, "keypoints": null }
//!   ]
//! }
//! ```
//!
//! [`TraceFrameSource`] and [`TracePoseEstimator`] replay it through the
//! pipeline in place of a live decoder and pose model. Lookups pick the
//! recorded frame nearest to the requested time (earlier frame on ties).

use crate::models::{Keypoint, Pose};
use crate::types::{EstimateError, Frame, FrameSource, PoseEstimator, SeekError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

/// Trace loading errors
#[derive(Debug, Error)]
pub enum TraceError {
    /// Trace file could not be read
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// Trace JSON is malformed
    #[error("Failed to parse trace: {0}")]
    Parse(#[from] serde_json::Error),

    /// Trace content violates its invariants
    #[error("Invalid trace: {0}")]
    Invalid(String),
}

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Frame time in seconds
    pub time: f64,
    /// Estimated keypoints (`null` when no person was detected)
    #[serde(default)]
    pub keypoints: Option<Vec<Keypoint>>,
}

/// Recorded keypoint trace for one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedTrace {
    /// Clip duration in seconds
    pub duration: f64,
    /// Frames sorted by time
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,
}

impl RecordedTrace {
    /// Load and validate a trace file
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let content = std::fs::read_to_string(path)?;
        let trace = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            duration = trace.duration,
            frames = trace.frames.len(),
            "Loaded recorded trace"
        );
        Ok(trace)
    }

    /// Parse and validate trace JSON
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let trace: RecordedTrace = serde_json::from_str(json)?;
        trace.validate()?;
        Ok(trace)
    }

    /// Frame times must be finite and sorted
    ///
    /// Duration is not checked here; the pipeline rejects invalid durations
    /// itself so the failure is reported like any other run.
    pub fn validate(&self) -> Result<(), TraceError> {
        if let Some(frame) = self.frames.iter().find(|f| !f.time.is_finite()) {
            return Err(TraceError::Invalid(format!(
                "frame time {} is not finite",
                frame.time
            )));
        }
        if let Some(pair) = self.frames.windows(2).find(|w| w[1].time < w[0].time) {
            return Err(TraceError::Invalid(format!(
                "frames not sorted by time ({} after {})",
                pair[1].time, pair[0].time
            )));
        }
        Ok(())
    }

    /// Index of the frame nearest to `time` (earlier frame on ties)
    pub fn nearest_index(&self, time: f64) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        let after = self.frames.partition_point(|f| f.time < time);
        if after == 0 {
            return Some(0);
        }
        if after == self.frames.len() {
            return Some(after - 1);
        }
        let before = after - 1;
        if time - self.frames[before].time <= self.frames[after].time - time {
            Some(before)
        } else {
            Some(after)
        }
    }

    /// Frame nearest to `time`
    pub fn nearest(&self, time: f64) -> Option<&RecordedFrame> {
        self.nearest_index(time).map(|i| &self.frames[i])
    }
}

/// Frame source backed by a recorded trace
///
/// Frames carry the recorded time and no pixel data.
pub struct TraceFrameSource {
    trace: Arc<RecordedTrace>,
    current: Mutex<Option<Frame>>,
}

impl TraceFrameSource {
    pub fn new(trace: Arc<RecordedTrace>) -> Self {
        Self {
            trace,
            current: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl FrameSource for TraceFrameSource {
    async fn seek(&self, time: f64) -> Result<Frame, SeekError> {
        let recorded = self
            .trace
            .nearest(time)
            .ok_or_else(|| SeekError::Unseekable("trace has no frames".to_string()))?;

        let frame = Frame::metadata_only(recorded.time);
        debug!(requested = time, recorded = recorded.time, "Trace seek");
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(frame.clone());
        Ok(frame)
    }

    fn current_frame(&self) -> Option<Frame> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Pose estimator that returns the recorded keypoints for a frame
pub struct TracePoseEstimator {
    trace: Arc<RecordedTrace>,
}

impl TracePoseEstimator {
    pub fn new(trace: Arc<RecordedTrace>) -> Self {
        Self { trace }
    }
}

#[async_trait::async_trait]
impl PoseEstimator for TracePoseEstimator {
    fn name(&self) -> &'static str {
        "recorded-trace"
    }

    async fn estimate(&self, frame: &Frame) -> Result<Option<Pose>, EstimateError> {
        let recorded = self
            .trace
            .nearest(frame.timestamp)
            .ok_or_else(|| EstimateError::NotReady("trace has no frames".to_string()))?;

        Ok(recorded
            .keypoints
            .as_ref()
            .map(|keypoints| Pose::new(keypoints.iter().cloned())))
    }
}
