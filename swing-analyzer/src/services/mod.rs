//! Analysis stage services

pub mod feature_extractor;
pub mod frame_sampler;
pub mod phase_segmenter;

pub use feature_extractor::{derive_club_velocity, segment_angle_degrees, FeatureExtractor};
pub use frame_sampler::{FrameSampler, SampledFrame};
pub use phase_segmenter::{PhaseSegmenter, SegmentationResult};
