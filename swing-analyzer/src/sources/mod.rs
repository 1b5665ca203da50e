//! Frame source and pose estimator implementations

pub mod recorded_trace;

pub use recorded_trace::{
    RecordedFrame, RecordedTrace, TraceError, TraceFrameSource, TracePoseEstimator,
};
