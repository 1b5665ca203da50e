//! Event types for swing analysis progress reporting
//!
//! Provides the shared event definitions and EventBus used by the analyzer
//! and any presentation layer listening to it.

mod analysis_types;

pub use analysis_types::{AnalysisStatus, PhaseMarkerInfo, PipelineStage};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Swing analysis event types
///
/// Events are broadcast via EventBus and can be serialized to JSON for any
/// presentation layer. Every event carries the `run_id` it belongs to so
/// listeners can discard events from superseded runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    /// Run status changed (e.g. Sampling → DetectingPoses)
    StatusChanged {
        /// Session UUID of the run
        session_id: Uuid,
        /// Monotonic run identifier
        run_id: u64,
        /// Status before change
        old_status: AnalysisStatus,
        /// Status after change
        new_status: AnalysisStatus,
        /// When status changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// One sample frame acquired
    FrameSampled {
        /// Monotonic run identifier
        run_id: u64,
        /// Sample index (0-based)
        index: usize,
        /// Total samples requested
        total: usize,
        /// Nominal sample time in seconds
        time: f64,
        /// Seek did not complete in time; best-effort frame used
        timed_out: bool,
    },

    /// Pose estimation finished for one sample
    PoseEstimated {
        /// Monotonic run identifier
        run_id: u64,
        /// Sample index (0-based)
        index: usize,
        /// Total samples
        total: usize,
        /// Sample time in seconds
        time: f64,
        /// Whether a pose was detected
        detected: bool,
    },

    /// Segmentation finished
    SegmentationCompleted {
        /// Monotonic run identifier
        run_id: u64,
        /// Number of labeled frames
        frame_count: usize,
        /// Phase boundary markers in canonical order
        markers: Vec<PhaseMarkerInfo>,
    },

    /// Non-fatal degradation (seek timeout, missing pose)
    Warning {
        /// Monotonic run identifier
        run_id: u64,
        /// Stage that degraded
        stage: PipelineStage,
        /// Human-readable message
        message: String,
    },

    /// Fatal stage failure; run aborted
    Failed {
        /// Monotonic run identifier
        run_id: u64,
        /// Stage that failed
        stage: PipelineStage,
        /// Human-readable message
        message: String,
    },
}

impl AnalysisEvent {
    /// Event type name (matches the serialized `type` tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            AnalysisEvent::StatusChanged { .. } => "StatusChanged",
            AnalysisEvent::FrameSampled { .. } => "FrameSampled",
            AnalysisEvent::PoseEstimated { .. } => "PoseEstimated",
            AnalysisEvent::SegmentationCompleted { .. } => "SegmentationCompleted",
            AnalysisEvent::Warning { .. } => "Warning",
            AnalysisEvent::Failed { .. } => "Failed",
        }
    }

    /// Run this event belongs to
    pub fn run_id(&self) -> u64 {
        match self {
            AnalysisEvent::StatusChanged { run_id, .. }
            | AnalysisEvent::FrameSampled { run_id, .. }
            | AnalysisEvent::PoseEstimated { run_id, .. }
            | AnalysisEvent::SegmentationCompleted { run_id, .. }
            | AnalysisEvent::Warning { run_id, .. }
            | AnalysisEvent::Failed { run_id, .. } => *run_id,
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking emit
/// - Multiple subscribers, each receiving every event
/// - Bounded capacity; slow subscribers lag and lose old events
///
/// # Examples
///
/// ```
/// use swing_common::events::{AnalysisEvent, EventBus, PipelineStage};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(AnalysisEvent::Warning {
///     run_id: 1,
///     stage: PipelineStage::Sampling,
///     message: "seek timed out".to_string(),
/// });
///
/// assert_eq!(rx.try_recv().unwrap().event_type(), "Warning");
/// ```
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<AnalysisEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: AnalysisEvent,
    ) -> Result<usize, broadcast::error::SendError<AnalysisEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: AnalysisEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
