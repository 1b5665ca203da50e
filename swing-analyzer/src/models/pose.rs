//! Pose keypoint model
//!
//! A pose is an ordered set of named 2D keypoints in normalized image
//! coordinates (0..1, origin top-left, y grows downward). Estimators name
//! joints either `left_shoulder` or `leftShoulder`; lookups accept both.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Joints the feature extractor reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointName {
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftWrist,
    RightWrist,
}

impl JointName {
    /// snake_case keypoint name (`left_shoulder`)
    pub fn snake_name(&self) -> &'static str {
        match self {
            JointName::LeftShoulder => "left_shoulder",
            JointName::RightShoulder => "right_shoulder",
            JointName::LeftHip => "left_hip",
            JointName::RightHip => "right_hip",
            JointName::LeftWrist => "left_wrist",
            JointName::RightWrist => "right_wrist",
        }
    }

    /// camelCase keypoint name (`leftShoulder`)
    pub fn camel_name(&self) -> &'static str {
        match self {
            JointName::LeftShoulder => "leftShoulder",
            JointName::RightShoulder => "rightShoulder",
            JointName::LeftHip => "leftHip",
            JointName::RightHip => "rightHip",
            JointName::LeftWrist => "leftWrist",
            JointName::RightWrist => "rightWrist",
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.snake_name())
    }
}

/// Single named keypoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Joint name as reported by the estimator
    pub name: String,
    /// Normalized horizontal position
    pub x: f64,
    /// Normalized vertical position (grows downward)
    pub y: f64,
    /// Relative depth, when the estimator provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detection confidence in [0, 1]
    #[serde(alias = "score")]
    pub confidence: f64,
}

impl Keypoint {
    /// Create a keypoint; confidence is clamped to [0, 1] (NaN becomes 0)
    pub fn new(name: impl Into<String>, x: f64, y: f64, confidence: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            z: None,
            confidence: clamp_confidence(confidence),
        }
    }

    /// Attach a depth value
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Confidence is at or above `threshold`
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Keypoints of one detected person
///
/// Names are unique within a pose. When an estimator reports the same name
/// twice, the first occurrence is kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Keypoint>", into = "Vec<Keypoint>")]
pub struct Pose {
    keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: impl IntoIterator<Item = Keypoint>) -> Self {
        let mut seen = HashSet::new();
        let keypoints = keypoints
            .into_iter()
            .filter(|kp| seen.insert(kp.name.clone()))
            .map(|mut kp| {
                kp.confidence = clamp_confidence(kp.confidence);
                kp
            })
            .collect();
        Self { keypoints }
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Keypoint with exactly this name
    pub fn get(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.name == name)
    }

    /// Keypoint for a joint, trying the snake_case name before camelCase
    pub fn joint(&self, joint: JointName) -> Option<&Keypoint> {
        self.get(joint.snake_name())
            .or_else(|| self.get(joint.camel_name()))
    }
}

impl From<Vec<Keypoint>> for Pose {
    fn from(keypoints: Vec<Keypoint>) -> Self {
        Pose::new(keypoints)
    }
}

impl From<Pose> for Vec<Keypoint> {
    fn from(pose: Pose) -> Self {
        pose.keypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Keypoint::new("nose", 0.5, 0.5, 1.7).confidence, 1.0);
        assert_eq!(Keypoint::new("nose", 0.5, 0.5, -0.2).confidence, 0.0);
        assert_eq!(Keypoint::new("nose", 0.5, 0.5, f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let pose = Pose::new(vec![
            Keypoint::new("left_wrist", 0.1, 0.2, 0.9),
            Keypoint::new("left_wrist", 0.8, 0.8, 0.95),
        ]);
        assert_eq!(pose.len(), 1);
        assert_eq!(pose.get("left_wrist").unwrap().x, 0.1);
    }

    #[test]
    fn test_joint_lookup_accepts_both_conventions() {
        let pose = Pose::new(vec![
            Keypoint::new("leftShoulder", 0.4, 0.3, 0.9),
            Keypoint::new("right_shoulder", 0.6, 0.3, 0.9),
        ]);
        assert!(pose.joint(JointName::LeftShoulder).is_some());
        assert!(pose.joint(JointName::RightShoulder).is_some());
        assert!(pose.joint(JointName::LeftHip).is_none());
    }

    #[test]
    fn test_snake_case_preferred() {
        let pose = Pose::new(vec![
            Keypoint::new("rightWrist", 0.1, 0.1, 0.9),
            Keypoint::new("right_wrist", 0.2, 0.2, 0.9),
        ]);
        assert_eq!(pose.joint(JointName::RightWrist).unwrap().x, 0.2);
    }

    #[test]
    fn test_deserialize_from_keypoint_array() {
        let json = r#"[
            {"name": "left_hip", "x": 0.45, "y": 0.6, "confidence": 0.8},
            {"name": "right_hip", "x": 0.55, "y": 0.6, "z": -0.1, "score": 1.4}
        ]"#;
        let pose: Pose = serde_json::from_str(json).unwrap();
        assert_eq!(pose.len(), 2);
        let right = pose.joint(JointName::RightHip).unwrap();
        assert_eq!(right.z, Some(-0.1));
        assert_eq!(right.confidence, 1.0);
    }
}
