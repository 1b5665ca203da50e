//! Synthetic swing generators
//!
//! Produces feature series, poses and recorded traces whose shoulder
//! rotation peaks at a chosen frame (top of backswing) and whose hand moves
//! fastest at a later chosen frame (impact).

use swing_analyzer::models::{FeatureVector, Keypoint, Pose};
use swing_analyzer::sources::{RecordedFrame, RecordedTrace};

/// Where the swing's key events fall in an `frames`-long series
#[derive(Debug, Clone, Copy)]
pub struct SwingShape {
    pub frames: usize,
    pub top: usize,
    pub impact: usize,
}

impl SwingShape {
    pub fn new(frames: usize, top: usize, impact: usize) -> Self {
        assert!(top < frames && impact < frames && top <= impact);
        Self {
            frames,
            top,
            impact,
        }
    }

    /// Shoulder rotation at frame `i`: unique peak of 85° at `top`
    pub fn shoulder_angle(&self, i: usize) -> f64 {
        let distance = (i as f64 - self.top as f64).abs();
        85.0 - 60.0 * distance / self.frames as f64
    }

    /// Hand height at frame `i`: slow drift, one large jump at `impact`
    pub fn hand_y(&self, i: usize) -> f64 {
        let drift = 0.01 * i as f64;
        let jump = if i >= self.impact && self.impact > 0 { 0.2 } else { 0.0 };
        0.3 + drift + jump
    }
}

/// Feature series following `shape`, one sample every 0.1 s
pub fn synthetic_features(shape: SwingShape) -> Vec<FeatureVector> {
    (0..shape.frames)
        .map(|i| FeatureVector {
            time: i as f64 * 0.1,
            shoulder_angle: Some(shape.shoulder_angle(i)),
            hip_angle: Some(shape.shoulder_angle(i) / 2.0),
            hand_y: Some(shape.hand_y(i)),
            ..Default::default()
        })
        .collect()
}

/// Pose whose shoulder line sits at `shoulder_deg` and right wrist at `hand_y`
pub fn synthetic_swing_pose(shoulder_deg: f64, hand_y: f64) -> Pose {
    let radians = shoulder_deg.to_radians();
    let (lx, ly) = (0.4, 0.3);
    let (hlx, hly) = (0.42, 0.55);
    Pose::new(vec![
        Keypoint::new("left_shoulder", lx, ly, 0.95),
        Keypoint::new("right_shoulder", lx + 0.2 * radians.cos(), ly + 0.2 * radians.sin(), 0.95),
        Keypoint::new("left_hip", hlx, hly, 0.9),
        Keypoint::new(
            "right_hip",
            hlx + 0.16 * (radians / 2.0).cos(),
            hly + 0.16 * (radians / 2.0).sin(),
            0.9,
        ),
        Keypoint::new("right_wrist", 0.5, hand_y, 0.9),
        Keypoint::new("left_wrist", 0.48, hand_y + 0.01, 0.9),
    ])
}

/// Recorded trace with one frame per sample time, following `shape`
pub fn synthetic_swing_trace(duration: f64, times: &[f64], shape: SwingShape) -> RecordedTrace {
    assert_eq!(times.len(), shape.frames);
    RecordedTrace {
        duration,
        frames: times
            .iter()
            .enumerate()
            .map(|(i, &time)| RecordedFrame {
                time,
                keypoints: Some(
                    synthetic_swing_pose(shape.shoulder_angle(i), shape.hand_y(i))
                        .keypoints()
                        .to_vec(),
                ),
            })
            .collect(),
    }
}
