//! Swing phase segmentation
//!
//! Heuristic, deterministic labeling of an ordered feature series:
//! - Top of backswing: largest absolute shoulder rotation
//! - Impact: fastest hand movement at or after the top
//! - Takeaway, downswing and follow-through are placed relative to those two
//!
//! Missing `shoulder_angle` / `hand_y` values count as zero. Ties resolve to
//! the earliest frame.

use crate::models::{
    FeatureVector, LabeledFrame, PhaseLabel, PhaseMarker, PhaseSegmentation, SegmentIndices,
};
use tracing::debug;

/// Segmentation output
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationResult {
    pub segmentation: PhaseSegmentation,
    /// One label per input vector, same order
    pub labeled_frames: Vec<LabeledFrame>,
    /// `None` for an empty series
    pub indices: Option<SegmentIndices>,
}

/// Phase segmenter
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseSegmenter;

impl PhaseSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Label a time-ordered feature series
    pub fn segment(&self, features: &[FeatureVector]) -> SegmentationResult {
        let Some(indices) = self.locate(features) else {
            debug!("Empty feature series, nothing to segment");
            return SegmentationResult {
                segmentation: PhaseSegmentation::empty(),
                labeled_frames: Vec::new(),
                indices: None,
            };
        };

        let markers = PhaseLabel::CANONICAL
            .iter()
            .filter_map(|&phase| {
                let frame_index = indices.index_of(phase)?;
                Some(PhaseMarker {
                    phase,
                    time: features[frame_index].time,
                    frame_index,
                })
            })
            .collect();

        let labeled_frames = features
            .iter()
            .enumerate()
            .map(|(i, fv)| LabeledFrame {
                features: *fv,
                phase: label_for(i, &indices),
            })
            .collect();

        debug!(
            frames = features.len(),
            top = indices.top,
            impact = indices.impact,
            "Segmentation complete"
        );

        SegmentationResult {
            segmentation: PhaseSegmentation::from_markers(markers),
            labeled_frames,
            indices: Some(indices),
        }
    }

    /// Boundary indices for a series (`None` when empty)
    ///
    /// Every returned index is a valid position in `features`.
    pub fn locate(&self, features: &[FeatureVector]) -> Option<SegmentIndices> {
        let m = features.len();
        match m {
            0 => return None,
            1 => {
                return Some(SegmentIndices {
                    address: 0,
                    takeaway: 0,
                    top: 0,
                    downswing: 0,
                    impact: 0,
                    follow_through: 0,
                })
            }
            _ => {}
        }

        let shoulder: Vec<f64> = features
            .iter()
            .map(|f| finite_or_zero(f.shoulder_angle))
            .collect();
        let hand_y: Vec<f64> = features.iter().map(|f| finite_or_zero(f.hand_y)).collect();

        let top = argmax_abs(&shoulder);

        let mut velocity = vec![0.0; m];
        for i in 1..m {
            velocity[i] = hand_y[i] - hand_y[i - 1];
        }

        let impact = if top == m - 1 {
            top
        } else {
            top + argmax_abs(&velocity[top..])
        };

        // Signed so a two-frame series does not underflow
        let top_i = top as i64;
        let mut takeaway = (top_i - 1).min(m as i64 - 3).max(1);
        if takeaway >= top_i {
            takeaway = (top_i - 1).max(0);
        }

        let downswing = (top + 1).max(impact.saturating_sub(1));
        let follow_through = (impact + 1).min(m - 1);

        Some(SegmentIndices {
            address: 0,
            takeaway: takeaway as usize,
            top,
            downswing: downswing.min(m - 1),
            impact,
            follow_through,
        })
    }
}

/// Label for frame `i`
///
/// Frames between takeaway and top (short clips where the takeaway index is
/// clamped well before the top) stay in `Takeaway`.
fn label_for(i: usize, idx: &SegmentIndices) -> PhaseLabel {
    if i <= idx.takeaway {
        if i == 0 {
            PhaseLabel::Address
        } else {
            PhaseLabel::Takeaway
        }
    } else if i < idx.top {
        PhaseLabel::Takeaway
    } else if i == idx.top {
        PhaseLabel::Top
    } else if i < idx.impact {
        PhaseLabel::Downswing
    } else if i == idx.impact {
        PhaseLabel::Impact
    } else if i > idx.impact {
        PhaseLabel::FollowThrough
    } else {
        PhaseLabel::Unknown
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Index of the largest magnitude, earliest on ties
fn argmax_abs(values: &[f64]) -> usize {
    let mut best_index = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, value) in values.iter().enumerate() {
        let magnitude = value.abs();
        if magnitude > best {
            best = magnitude;
            best_index = i;
        }
    }
    best_index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(shoulder: &[f64], hand_y: &[f64]) -> Vec<FeatureVector> {
        shoulder
            .iter()
            .zip(hand_y)
            .enumerate()
            .map(|(i, (&s, &h))| FeatureVector {
                time: i as f64 * 0.1,
                shoulder_angle: Some(s),
                hand_y: Some(h),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_empty_series() {
        let result = PhaseSegmenter::new().segment(&[]);
        assert!(result.segmentation.is_empty());
        assert!(result.labeled_frames.is_empty());
        assert!(result.indices.is_none());
    }

    #[test]
    fn test_single_frame_collapses() {
        let result = PhaseSegmenter::new().segment(&[FeatureVector::empty(1.25)]);
        assert_eq!(result.labeled_frames.len(), 1);
        assert_eq!(result.labeled_frames[0].phase, PhaseLabel::Address);
        assert_eq!(result.segmentation.markers().len(), 6);
        assert!(result.segmentation.markers().iter().all(|m| m.time == 1.25));
    }

    #[test]
    fn test_two_frames_do_not_underflow() {
        let features = series(&[5.0, 30.0], &[0.5, 0.2]);
        let idx = PhaseSegmenter::new().locate(&features).unwrap();
        assert_eq!(idx.top, 1);
        assert_eq!(idx.impact, 1);
        assert_eq!(idx.takeaway, 0);
        assert_eq!(idx.downswing, 1);
        assert_eq!(idx.follow_through, 1);
    }

    #[test]
    fn test_top_at_first_frame() {
        let features = series(&[40.0, 10.0, 5.0, 0.0], &[0.2, 0.3, 0.6, 0.65]);
        let result = PhaseSegmenter::new().segment(&features);
        let idx = result.indices.unwrap();
        assert_eq!(idx.top, 0);
        assert_eq!(idx.takeaway, 0);
        assert_eq!(idx.impact, 2);
        let labels: Vec<_> = result.labeled_frames.iter().map(|f| f.phase).collect();
        assert_eq!(
            labels,
            vec![
                PhaseLabel::Address,
                PhaseLabel::Downswing,
                PhaseLabel::Impact,
                PhaseLabel::FollowThrough
            ]
        );
    }

    #[test]
    fn test_short_clip_gap_stays_takeaway() {
        // Top at the last frame of four: takeaway clamps to 1, frame 2 sits between
        let features = series(&[0.0, 10.0, 20.0, 45.0], &[0.6, 0.5, 0.4, 0.2]);
        let result = PhaseSegmenter::new().segment(&features);
        let labels: Vec<_> = result.labeled_frames.iter().map(|f| f.phase).collect();
        assert_eq!(
            labels,
            vec![
                PhaseLabel::Address,
                PhaseLabel::Takeaway,
                PhaseLabel::Takeaway,
                PhaseLabel::Top
            ]
        );
    }

    #[test]
    fn test_missing_values_count_as_zero() {
        let mut features = series(&[0.0, 10.0, 60.0, 20.0, 0.0], &[0.5, 0.4, 0.2, 0.5, 0.55]);
        features[2].shoulder_angle = None;
        let idx = PhaseSegmenter::new().locate(&features).unwrap();
        assert_eq!(idx.top, 3);
    }

    #[test]
    fn test_ties_pick_earliest() {
        assert_eq!(argmax_abs(&[1.0, -3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax_abs(&[0.0, 0.0]), 0);
    }
}
