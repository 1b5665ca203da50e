//! Scripted frame sources and pose estimators
//!
//! Deterministic stand-ins for a video decoder and pose model. Behavior is
//! keyed by call index (seeks) or by frame timestamp (estimates).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use swing_analyzer::models::Pose;
use swing_analyzer::types::{EstimateError, Frame, FrameSource, PoseEstimator, SeekError};

/// Long enough to outlast any configured timeout
const STALL: Duration = Duration::from_secs(3600);

/// Frame source whose seeks can be delayed, stalled or failed by call index
#[derive(Default)]
pub struct ScriptedFrameSource {
    seek_delay: Duration,
    stall_calls: HashSet<usize>,
    fail_calls: HashSet<usize>,
    unseekable: bool,
    calls: Mutex<usize>,
    positions: Mutex<Vec<f64>>,
    current: Mutex<Option<Frame>>,
}

impl ScriptedFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every seek sleeps this long before answering
    pub fn with_seek_delay(mut self, delay: Duration) -> Self {
        self.seek_delay = delay;
        self
    }

    /// The seek with this call index never answers
    pub fn stall_on(mut self, call: usize) -> Self {
        self.stall_calls.insert(call);
        self
    }

    /// The seek with this call index fails with a decode error
    pub fn fail_on(mut self, call: usize) -> Self {
        self.fail_calls.insert(call);
        self
    }

    /// Every seek fails with `Unseekable`
    pub fn unseekable(mut self) -> Self {
        self.unseekable = true;
        self
    }

    /// Positions requested so far, in call order
    pub fn positions(&self) -> Vec<f64> {
        self.positions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl FrameSource for ScriptedFrameSource {
    async fn seek(&self, time: f64) -> Result<Frame, SeekError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let call = *calls;
            *calls += 1;
            call
        };
        self.positions.lock().unwrap().push(time);

        if self.unseekable {
            return Err(SeekError::Unseekable("no media loaded".to_string()));
        }
        if self.fail_calls.contains(&call) {
            return Err(SeekError::Decode {
                time,
                reason: "corrupt packet".to_string(),
            });
        }
        if self.stall_calls.contains(&call) {
            tokio::time::sleep(STALL).await;
        }
        if !self.seek_delay.is_zero() {
            tokio::time::sleep(self.seek_delay).await;
        }

        let frame = Frame::new(time, 2, 2, vec![0; 16]);
        *self.current.lock().unwrap() = Some(frame.clone());
        Ok(frame)
    }

    fn current_frame(&self) -> Option<Frame> {
        self.current.lock().unwrap().clone()
    }
}

/// Pose estimator answering from a table of `(time, pose)` entries
///
/// Each frame gets the entry nearest to its timestamp.
#[derive(Default)]
pub struct ScriptedPoseEstimator {
    table: Vec<(f64, Option<Pose>)>,
    fail_times: Vec<f64>,
    stall_times: Vec<f64>,
    estimate_calls: Mutex<HashMap<u64, usize>>,
}

impl ScriptedPoseEstimator {
    pub fn new(table: Vec<(f64, Option<Pose>)>) -> Self {
        Self {
            table,
            ..Default::default()
        }
    }

    /// Estimates for frames at `time` fail
    pub fn fail_at(mut self, time: f64) -> Self {
        self.fail_times.push(time);
        self
    }

    /// Estimates for frames at `time` never answer
    pub fn stall_at(mut self, time: f64) -> Self {
        self.stall_times.push(time);
        self
    }

    /// Total estimate calls
    pub fn call_count(&self) -> usize {
        self.estimate_calls.lock().unwrap().values().sum()
    }

    fn matches(times: &[f64], time: f64) -> bool {
        times.iter().any(|t| (t - time).abs() < 1e-9)
    }
}

#[async_trait::async_trait]
impl PoseEstimator for ScriptedPoseEstimator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn estimate(&self, frame: &Frame) -> Result<Option<Pose>, EstimateError> {
        *self
            .estimate_calls
            .lock()
            .unwrap()
            .entry(frame.timestamp.to_bits())
            .or_insert(0) += 1;

        if Self::matches(&self.fail_times, frame.timestamp) {
            return Err(EstimateError::Inference("tensor shape mismatch".to_string()));
        }
        if Self::matches(&self.stall_times, frame.timestamp) {
            tokio::time::sleep(STALL).await;
        }

        Ok(self
            .table
            .iter()
            .min_by(|a, b| {
                (a.0 - frame.timestamp)
                    .abs()
                    .total_cmp(&(b.0 - frame.timestamp).abs())
            })
            .and_then(|(_, pose)| pose.clone()))
    }
}
