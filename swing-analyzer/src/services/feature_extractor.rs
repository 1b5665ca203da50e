//! Pose → swing feature extraction
//!
//! Pure, per-frame. Features whose keypoints are missing or below the
//! confidence threshold stay unset; they are never defaulted to zero.
//!
//! Angles follow image coordinates (y grows downward), so a shoulder line
//! whose right end sits lower on screen has a positive angle.

use crate::config::{FeatureConfig, HandPreference};
use crate::models::{FeatureVector, JointName, Keypoint, Pose};

/// Feature extractor
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    min_confidence: f64,
    hand_preference: HandPreference,
}

impl FeatureExtractor {
    pub fn new(config: &FeatureConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            hand_preference: config.hand_preference,
        }
    }

    /// Features for one sample
    ///
    /// `club_velocity` is left unset; see [`derive_club_velocity`].
    pub fn extract(&self, time: f64, pose: Option<&Pose>) -> FeatureVector {
        let Some(pose) = pose else {
            return FeatureVector::empty(time);
        };

        let hand = self.club_hand(pose);

        FeatureVector {
            time,
            shoulder_angle: self.line_angle(pose, JointName::LeftShoulder, JointName::RightShoulder),
            hip_angle: self.line_angle(pose, JointName::LeftHip, JointName::RightHip),
            hand_y: hand.map(|kp| kp.y),
            hand_z: hand.and_then(|kp| kp.z).filter(|z| z.is_finite()),
            club_velocity: None,
        }
    }

    fn confident_joint<'a>(&self, pose: &'a Pose, joint: JointName) -> Option<&'a Keypoint> {
        pose.joint(joint).filter(|kp| {
            kp.is_confident(self.min_confidence) && kp.x.is_finite() && kp.y.is_finite()
        })
    }

    fn line_angle(&self, pose: &Pose, left: JointName, right: JointName) -> Option<f64> {
        let left = self.confident_joint(pose, left)?;
        let right = self.confident_joint(pose, right)?;
        Some(segment_angle_degrees((left.x, left.y), (right.x, right.y)))
    }

    /// First confident wrist in preference order
    fn club_hand<'a>(&self, pose: &'a Pose) -> Option<&'a Keypoint> {
        self.hand_preference
            .wrist_order()
            .iter()
            .find_map(|&wrist| self.confident_joint(pose, wrist))
    }
}

/// Angle of the segment `left → right` in degrees, within (-180, 180]
pub fn segment_angle_degrees(left: (f64, f64), right: (f64, f64)) -> f64 {
    let dx = right.0 - left.0;
    let dy = right.1 - left.1;
    let angle = dy.atan2(dx).to_degrees();
    if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Fill in `club_velocity` as the per-sample change in `hand_y`
///
/// The first frame, and any frame where either neighbor lacks `hand_y`,
/// gets no velocity.
pub fn derive_club_velocity(features: &mut [FeatureVector]) {
    let mut previous_hand_y = None;
    for feature in features.iter_mut() {
        feature.club_velocity = match (previous_hand_y, feature.hand_y) {
            (Some(prev), Some(current)) => Some(current - prev),
            _ => None,
        };
        previous_hand_y = feature.hand_y;
    }
}
