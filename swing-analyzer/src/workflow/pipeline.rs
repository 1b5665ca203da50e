//! Analysis pipeline orchestrator
//!
//! Runs the stages strictly in sequence for one invocation:
//! - **Validation**: config and duration checks, sample time computation
//! - **Sampling**: one bounded seek per sample time
//! - **Pose detection**: one bounded estimate per frame, then feature extraction
//! - **Segmentation**: phase labeling of the feature series
//!
//! # Error Handling
//! - Seek timeouts and missing poses degrade the affected sample and are
//!   recorded as warnings
//! - Seek failures, invalid durations and cancellation abort the run; the
//!   returned [`PipelineError`] carries the partial session
//!
//! # Example
//! ```rust,ignore
//! let analyzer = SwingAnalyzer::new(AnalyzerConfig::default());
//! let report = analyzer.analyze(duration, 16, &source, &estimator).await?;
//! for marker in report.segmentation.markers() {
//!     println!("{}", marker);
//! }
//! ```

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, PipelineError};
use crate::models::{AnalysisReport, AnalysisSession, AnalysisWarning, FrameSample, Pose};
use crate::services::{
    derive_club_velocity, FeatureExtractor, FrameSampler, PhaseSegmenter, SampledFrame,
};
use crate::types::{FrameSource, PoseEstimator};
use crate::utils::{bounded_wait, WaitOutcome};
use crate::workflow::{RunHandle, RunId, RunRegistry};
use std::sync::Arc;
use swing_common::events::{AnalysisEvent, AnalysisStatus, EventBus, PipelineStage};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Swing analyzer
///
/// Owns the stage services, the run registry and an optional event bus.
/// Calling [`analyze`](Self::analyze) again while a run is in flight
/// supersedes that run.
pub struct SwingAnalyzer {
    config: AnalyzerConfig,
    sampler: FrameSampler,
    extractor: FeatureExtractor,
    segmenter: PhaseSegmenter,
    registry: Arc<RunRegistry>,
    event_bus: Option<Arc<EventBus>>,
}

impl SwingAnalyzer {
    /// Create analyzer with configuration
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            sampler: FrameSampler::new(config.sampling.clone()),
            extractor: FeatureExtractor::new(&config.features),
            segmenter: PhaseSegmenter::new(),
            registry: Arc::new(RunRegistry::new()),
            event_bus: None,
            config,
        }
    }

    /// Create analyzer that publishes progress on `event_bus`
    pub fn with_event_bus(config: AnalyzerConfig, event_bus: Arc<EventBus>) -> Self {
        let mut analyzer = Self::new(config);
        analyzer.event_bus = Some(event_bus);
        analyzer
    }

    /// Share a run registry with other analyzers
    pub fn with_registry(mut self, registry: Arc<RunRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<RunRegistry> {
        &self.registry
    }

    /// Cancel the in-flight run, if any
    pub fn cancel_current(&self) -> Option<RunId> {
        self.registry.cancel_current()
    }

    /// Analyze one clip
    ///
    /// # Arguments
    /// * `duration` - Clip duration in seconds
    /// * `sample_count` - Number of frames to sample
    /// * `source` - Frame source for the clip
    /// * `estimator` - Pose estimator
    pub async fn analyze(
        &self,
        duration: f64,
        sample_count: usize,
        source: &dyn FrameSource,
        estimator: &dyn PoseEstimator,
    ) -> Result<AnalysisReport, PipelineError> {
        let run = self.registry.begin_run();
        let session = AnalysisSession::new(run.id(), duration, sample_count);
        let span = info_span!(
            "analysis",
            run_id = %run.id(),
            session_id = %session.session_id
        );

        let result = self
            .run_stages(session, &run, source, estimator)
            .instrument(span)
            .await;

        self.registry.finish(run.id());
        result
    }

    async fn run_stages(
        &self,
        mut session: AnalysisSession,
        run: &RunHandle,
        source: &dyn FrameSource,
        estimator: &dyn PoseEstimator,
    ) -> Result<AnalysisReport, PipelineError> {
        let duration = session.duration;
        info!(
            duration,
            sample_count = session.sample_count,
            estimator = estimator.name(),
            "Starting swing analysis"
        );

        // Validation
        if let Err(e) = self.config.validate() {
            let error = AnalysisError::InvalidConfig(e.to_string());
            return Err(self.fail(session, PipelineStage::Validation, error));
        }
        let times = match self.sampler.sample_times(duration, session.sample_count) {
            Ok(times) => times,
            Err(e) => return Err(self.fail(session, PipelineStage::Validation, e)),
        };

        // Stage 1: frame sampling
        self.transition(&mut session, AnalysisStatus::Sampling);
        let total = times.len();
        let acquired = {
            let session = &mut session;
            self.sampler
                .acquire_all(source, duration, &times, run, |index, sampled| {
                    session.sample_times.push(sampled.time);
                    if sampled.timed_out {
                        let timeout = AnalysisError::SeekTimeout {
                            time: sampled.time,
                            timeout_ms: self.config.sampling.seek_timeout_ms,
                        };
                        self.record_warning(session, PipelineStage::Sampling, &timeout);
                    }
                    self.emit(AnalysisEvent::FrameSampled {
                        run_id: run.id().value(),
                        index,
                        total,
                        time: sampled.time,
                        timed_out: sampled.timed_out,
                    });
                })
                .await
        };
        let frames = match acquired {
            Ok(frames) => frames,
            Err(e) => return Err(self.fail(session, PipelineStage::Sampling, e)),
        };
        info!(
            frames = frames.len(),
            timed_out = frames.iter().filter(|f| f.timed_out).count(),
            "Frame sampling complete"
        );
        if let Err(e) = self.ensure_current(run) {
            return Err(self.fail(session, PipelineStage::Sampling, e));
        }

        // Stage 2: pose detection + feature extraction
        self.transition(&mut session, AnalysisStatus::DetectingPoses);
        for (index, sampled) in frames.iter().enumerate() {
            let pose = match self.estimate_pose(estimator, sampled, run).await {
                Ok(pose) => pose,
                Err(e) if !e.is_fatal() => {
                    self.record_warning(&mut session, PipelineStage::PoseDetection, &e);
                    None
                }
                Err(e) => return Err(self.fail(session, PipelineStage::PoseDetection, e)),
            };

            self.emit(AnalysisEvent::PoseEstimated {
                run_id: run.id().value(),
                index,
                total,
                time: sampled.time,
                detected: pose.is_some(),
            });

            session
                .features
                .push(self.extractor.extract(sampled.time, pose.as_ref()));
            session.samples.push(FrameSample {
                time: sampled.time,
                pose,
            });
        }
        derive_club_velocity(&mut session.features);
        info!(
            detected = session.samples.iter().filter(|s| s.pose.is_some()).count(),
            frames = session.samples.len(),
            "Pose detection complete"
        );
        if let Err(e) = self.ensure_current(run) {
            return Err(self.fail(session, PipelineStage::PoseDetection, e));
        }

        // Stage 3: segmentation
        self.transition(&mut session, AnalysisStatus::Segmenting);
        let result = self.segmenter.segment(&session.features);
        self.emit(AnalysisEvent::SegmentationCompleted {
            run_id: run.id().value(),
            frame_count: result.labeled_frames.len(),
            markers: result.segmentation.marker_infos(),
        });
        if let Err(e) = self.ensure_current(run) {
            return Err(self.fail(session, PipelineStage::Segmentation, e));
        }

        self.transition(&mut session, AnalysisStatus::Done);
        info!(
            markers = result.segmentation.markers().len(),
            warnings = session.warnings.len(),
            "Swing analysis complete"
        );

        Ok(AnalysisReport {
            session,
            labeled_frames: result.labeled_frames,
            segmentation: result.segmentation,
            indices: result.indices,
        })
    }

    /// Bounded pose estimate for one sampled frame
    ///
    /// Non-fatal errors are `PoseUnavailable`; cancellation is fatal.
    async fn estimate_pose(
        &self,
        estimator: &dyn PoseEstimator,
        sampled: &SampledFrame,
        run: &RunHandle,
    ) -> Result<Option<Pose>, AnalysisError> {
        let Some(frame) = &sampled.frame else {
            return Err(AnalysisError::PoseUnavailable {
                time: sampled.time,
                reason: "no frame available".to_string(),
            });
        };

        match bounded_wait(
            "pose estimate",
            self.config.pose.estimate_timeout(),
            run.token(),
            estimator.estimate(frame),
        )
        .await
        {
            WaitOutcome::Completed(Ok(pose)) => {
                if pose.is_none() {
                    debug!(time = sampled.time, "No pose detected");
                }
                Ok(pose)
            }
            WaitOutcome::Completed(Err(e)) => Err(AnalysisError::PoseUnavailable {
                time: sampled.time,
                reason: e.to_string(),
            }),
            WaitOutcome::TimedOut => Err(AnalysisError::PoseUnavailable {
                time: sampled.time,
                reason: format!(
                    "{} timed out after {} ms",
                    estimator.name(),
                    self.config.pose.estimate_timeout_ms
                ),
            }),
            WaitOutcome::Cancelled => Err(AnalysisError::Cancelled {
                run_id: run.id().value(),
            }),
        }
    }

    fn ensure_current(&self, run: &RunHandle) -> Result<(), AnalysisError> {
        if run.is_cancelled() || !self.registry.is_current(run.id()) {
            Err(AnalysisError::Cancelled {
                run_id: run.id().value(),
            })
        } else {
            Ok(())
        }
    }

    fn transition(&self, session: &mut AnalysisSession, status: AnalysisStatus) {
        let transition = session.transition_to(status);
        debug!(
            old_status = %transition.old_status,
            new_status = %transition.new_status,
            "Analysis status changed"
        );
        self.emit(AnalysisEvent::StatusChanged {
            session_id: transition.session_id,
            run_id: transition.run_id.value(),
            old_status: transition.old_status,
            new_status: transition.new_status,
            timestamp: transition.transitioned_at,
        });
    }

    fn record_warning(
        &self,
        session: &mut AnalysisSession,
        stage: PipelineStage,
        warning: &AnalysisError,
    ) {
        warn!(stage = %stage, time = ?warning.time(), "{}", warning);
        session.add_warning(AnalysisWarning::from_error(stage, warning));
        self.emit(AnalysisEvent::Warning {
            run_id: session.run_id.value(),
            stage,
            message: warning.to_string(),
        });
    }

    /// Abort the run: terminal status, failure event, partial results
    fn fail(
        &self,
        mut session: AnalysisSession,
        stage: PipelineStage,
        error: AnalysisError,
    ) -> PipelineError {
        let status = match error {
            AnalysisError::Cancelled { .. } => {
                info!(stage = %stage, "Analysis run cancelled");
                AnalysisStatus::Cancelled
            }
            _ => {
                error!(stage = %stage, error = %error, "Analysis stage failed");
                AnalysisStatus::Error
            }
        };

        self.transition(&mut session, status);
        self.emit(AnalysisEvent::Failed {
            run_id: session.run_id.value(),
            stage,
            message: error.to_string(),
        });

        PipelineError {
            stage,
            error,
            partial: Box::new(session),
        }
    }

    fn emit(&self, event: AnalysisEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit_lossy(event);
        }
    }
}

/// Analyze one clip with a fresh [`SwingAnalyzer`]
pub async fn analyze(
    duration: f64,
    sample_count: usize,
    frame_source: &dyn FrameSource,
    pose_estimator: &dyn PoseEstimator,
    config: &AnalyzerConfig,
) -> Result<AnalysisReport, PipelineError> {
    SwingAnalyzer::new(config.clone())
        .analyze(duration, sample_count, frame_source, pose_estimator)
        .await
}
