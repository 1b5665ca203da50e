//! Swing phase labels and segmentation output

use crate::models::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use swing_common::events::PhaseMarkerInfo;

/// Swing phase
///
/// Variants are declared in canonical swing order; `Unknown` sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PhaseLabel {
    Address,
    Takeaway,
    Top,
    Downswing,
    Impact,
    FollowThrough,
    Unknown,
}

impl PhaseLabel {
    /// The six real phases, in swing order
    pub const CANONICAL: [PhaseLabel; 6] = [
        PhaseLabel::Address,
        PhaseLabel::Takeaway,
        PhaseLabel::Top,
        PhaseLabel::Downswing,
        PhaseLabel::Impact,
        PhaseLabel::FollowThrough,
    ];

    /// Position in the canonical order (`None` for `Unknown`)
    pub fn canonical_rank(&self) -> Option<usize> {
        Self::CANONICAL.iter().position(|p| p == self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseLabel::Address => "Address",
            PhaseLabel::Takeaway => "Takeaway",
            PhaseLabel::Top => "Top",
            PhaseLabel::Downswing => "Downswing",
            PhaseLabel::Impact => "Impact",
            PhaseLabel::FollowThrough => "FollowThrough",
            PhaseLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PhaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Time at which a phase begins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseMarker {
    pub phase: PhaseLabel,
    /// Seconds from video start
    pub time: f64,
    /// Index into the feature series the marker was taken from
    pub frame_index: usize,
}

impl fmt::Display for PhaseMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.2}s", self.phase, self.time)
    }
}

impl From<&PhaseMarker> for PhaseMarkerInfo {
    fn from(marker: &PhaseMarker) -> Self {
        PhaseMarkerInfo {
            phase: marker.phase.to_string(),
            time: marker.time,
        }
    }
}

/// Ordered phase markers for one swing
///
/// Either empty (no frames) or exactly the six canonical phases in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseSegmentation {
    markers: Vec<PhaseMarker>,
}

impl PhaseSegmentation {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_markers(markers: Vec<PhaseMarker>) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &[PhaseMarker] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Start time of a phase
    pub fn time_of(&self, phase: PhaseLabel) -> Option<f64> {
        self.markers
            .iter()
            .find(|m| m.phase == phase)
            .map(|m| m.time)
    }

    /// Marker summaries for event payloads
    pub fn marker_infos(&self) -> Vec<PhaseMarkerInfo> {
        self.markers.iter().map(PhaseMarkerInfo::from).collect()
    }
}

/// Feature vector plus its assigned phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledFrame {
    #[serde(flatten)]
    pub features: FeatureVector,
    pub phase: PhaseLabel,
}

/// Resolved boundary indices into the feature series
///
/// All indices are valid positions in the series they were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentIndices {
    pub address: usize,
    pub takeaway: usize,
    pub top: usize,
    pub downswing: usize,
    pub impact: usize,
    pub follow_through: usize,
}

impl SegmentIndices {
    /// Index of a phase boundary (`None` for `Unknown`)
    pub fn index_of(&self, phase: PhaseLabel) -> Option<usize> {
        match phase {
            PhaseLabel::Address => Some(self.address),
            PhaseLabel::Takeaway => Some(self.takeaway),
            PhaseLabel::Top => Some(self.top),
            PhaseLabel::Downswing => Some(self.downswing),
            PhaseLabel::Impact => Some(self.impact),
            PhaseLabel::FollowThrough => Some(self.follow_through),
            PhaseLabel::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        assert!(PhaseLabel::Address < PhaseLabel::Takeaway);
        assert!(PhaseLabel::Impact < PhaseLabel::FollowThrough);
        assert!(PhaseLabel::FollowThrough < PhaseLabel::Unknown);
        assert_eq!(PhaseLabel::Top.canonical_rank(), Some(2));
        assert_eq!(PhaseLabel::Unknown.canonical_rank(), None);
    }

    #[test]
    fn test_marker_display() {
        let marker = PhaseMarker {
            phase: PhaseLabel::Top,
            time: 1.234,
            frame_index: 8,
        };
        assert_eq!(marker.to_string(), "Top @ 1.23s");
    }

    #[test]
    fn test_labeled_frame_serializes_flat() {
        let frame = LabeledFrame {
            features: FeatureVector {
                time: 0.5,
                hand_y: Some(0.4),
                ..Default::default()
            },
            phase: PhaseLabel::Takeaway,
        };
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json["time"], 0.5);
        assert_eq!(json["handY"], 0.4);
        assert_eq!(json["phase"], "Takeaway");
    }
}
