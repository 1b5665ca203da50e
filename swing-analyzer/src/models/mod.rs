//! Data models for swing-analyzer

pub mod analysis_session;
pub mod features;
pub mod phase;
pub mod pose;

pub use analysis_session::{
    AnalysisReport, AnalysisSession, AnalysisWarning, FrameSample, StatusTransition,
};
pub use features::FeatureVector;
pub use phase::{LabeledFrame, PhaseLabel, PhaseMarker, PhaseSegmentation, SegmentIndices};
pub use pose::{JointName, Keypoint, Pose};
