//! Test Helper Utilities
//!
//! Shared utilities for testing swing-analyzer

#![allow(dead_code)]

pub mod log_capture;
pub mod scripted;
pub mod swing_generator;

// Re-export commonly used items
pub use log_capture::{capture_logs, LogCapture};
pub use scripted::{ScriptedFrameSource, ScriptedPoseEstimator};
pub use swing_generator::{
    synthetic_features, synthetic_swing_pose, synthetic_swing_trace, SwingShape,
};
