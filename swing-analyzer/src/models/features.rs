//! Per-frame swing feature vector

use serde::{Deserialize, Serialize};

/// Numeric features for one sampled instant
///
/// Every feature is optional. A frame with no usable pose has all of them
/// unset. `club_velocity` is filled in after the whole series is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Sample time in seconds
    pub time: f64,
    /// Shoulder line angle in degrees, (-180, 180]
    pub shoulder_angle: Option<f64>,
    /// Hip line angle in degrees, (-180, 180]
    pub hip_angle: Option<f64>,
    /// Normalized vertical position of the club hand
    pub hand_y: Option<f64>,
    /// Depth of the club hand, when the estimator provides one
    pub hand_z: Option<f64>,
    /// Per-sample change in `hand_y`
    pub club_velocity: Option<f64>,
}

impl FeatureVector {
    /// Features for a frame without a usable pose
    pub fn empty(time: f64) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// Whether any pose-derived feature is set
    pub fn has_pose_features(&self) -> bool {
        self.shoulder_angle.is_some()
            || self.hip_angle.is_some()
            || self.hand_y.is_some()
            || self.hand_z.is_some()
    }
}
