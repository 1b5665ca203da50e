//! swing-analyzer library interface
//!
//! Golf swing phase analysis from pose keypoints. A clip is sampled at evenly
//! spaced instants, a pose estimator turns each frame into keypoints, the
//! keypoints become per-frame features, and a heuristic segmenter labels the
//! series with the six swing phases (Address, Takeaway, Top, Downswing,
//! Impact, FollowThrough).
//!
//! Video decoding and pose inference live behind the [`FrameSource`] and
//! [`PoseEstimator`] traits. [`sources`] provides a recorded-trace
//! implementation of both.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod sources;
pub mod types;
pub mod utils;
pub mod workflow;

pub use config::{AnalyzerConfig, AnalyzerToml, HandPreference};
pub use error::{AnalysisError, PipelineError};
pub use models::{
    AnalysisReport, AnalysisSession, FeatureVector, Keypoint, LabeledFrame, PhaseLabel,
    PhaseMarker, PhaseSegmentation, Pose, SegmentIndices,
};
pub use types::{EstimateError, Frame, FrameSource, PoseEstimator, SeekError};
pub use workflow::{analyze, RunId, RunRegistry, SwingAnalyzer};

/// Build identification captured by build.rs
pub mod build_info {
    /// Short git commit hash ("unknown" outside a git checkout)
    pub const GIT_HASH: &str = env!("GIT_HASH");
    /// Build timestamp (RFC 3339)
    pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
    /// Cargo profile
    pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");
}
