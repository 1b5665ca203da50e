//! External collaborator interfaces
//!
//! The analyzer never decodes video or runs a pose model itself. It talks to
//! both through these traits:
//! - [`FrameSource`]: positions the media and hands back a raster frame
//! - [`PoseEstimator`]: turns a frame into zero or one pose
//!
//! Both are async because seeking and model inference may suspend. Callers
//! bound every call with a timeout (see `utils::bounded_wait`).

use crate::models::Pose;
use thiserror::Error;

/// Decoded raster frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Media position the frame was actually decoded at, in seconds
    pub timestamp: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA8 pixel data (`width * height * 4` bytes; empty for replayed frames)
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a frame from RGBA pixel data
    pub fn new(timestamp: f64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            timestamp,
            width,
            height,
            data,
        }
    }

    /// Frame with a position but no pixels
    ///
    /// Used by sources that replay previously estimated keypoints, where the
    /// estimator only needs to know which instant the frame belongs to.
    pub fn metadata_only(timestamp: f64) -> Self {
        Self::new(timestamp, 0, 0, Vec::new())
    }

    /// Whether the frame carries pixel data
    pub fn has_pixels(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Frame source failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeekError {
    /// Media cannot be positioned at all (not loaded, stream not seekable)
    #[error("media is not seekable: {0}")]
    Unseekable(String),

    /// Positioning succeeded but the frame could not be decoded
    #[error("decode failed at {time:.3}s: {reason}")]
    Decode {
        /// Requested position in seconds
        time: f64,
        /// Decoder message
        reason: String,
    },
}

/// Pose estimator failures
///
/// "No pose found" is not an error; estimators return `Ok(None)` for that.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// Model not loaded or disposed
    #[error("pose model not ready: {0}")]
    NotReady(String),

    /// Inference itself failed
    #[error("pose inference failed: {0}")]
    Inference(String),
}

/// Source of decoded frames for one video
///
/// One source usually wraps a single decoder, so the analyzer never issues
/// overlapping seeks against the same source.
#[async_trait::async_trait]
pub trait FrameSource: Send + Sync {
    /// Position the media at `time` seconds and return the decoded frame
    async fn seek(&self, time: f64) -> Result<Frame, SeekError>;

    /// Whatever frame the source currently holds, if any
    ///
    /// Used as the best-effort fallback when a seek does not finish in time;
    /// the returned frame may be stale.
    fn current_frame(&self) -> Option<Frame>;
}

/// Single-person 2D pose estimator
#[async_trait::async_trait]
pub trait PoseEstimator: Send + Sync {
    /// Estimator name for logging
    fn name(&self) -> &'static str;

    /// Estimate the pose in `frame`
    ///
    /// Returns `Ok(None)` when no person is detected.
    async fn estimate(&self, frame: &Frame) -> Result<Option<Pose>, EstimateError>;
}
