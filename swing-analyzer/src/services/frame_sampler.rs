//! Frame sampling
//!
//! Picks `N` evenly spaced instants inside the central part of the clip
//! (default 5%..95% of duration, skipping setup and walk-off footage) and
//! acquires one frame per instant from a [`FrameSource`].
//!
//! Seeks are issued one at a time. A seek that does not finish within the
//! configured timeout falls back to whatever frame the source currently
//! holds; a seek that fails outright aborts sampling.

use crate::config::SamplingConfig;
use crate::error::AnalysisError;
use crate::types::{Frame, FrameSource};
use crate::utils::{bounded_wait, WaitOutcome};
use crate::workflow::RunHandle;
use tracing::{debug, warn};

/// Gap kept between the last seek position and the end of the media
const END_GUARD_SECONDS: f64 = 0.01;

/// Frame acquired for one sample time
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame {
    /// Nominal sample time in seconds
    pub time: f64,
    /// Acquired frame (`None` when a timed-out seek left nothing to fall back on)
    pub frame: Option<Frame>,
    /// The seek timed out and `frame` is a best-effort fallback
    pub timed_out: bool,
}

/// Frame sampler
pub struct FrameSampler {
    config: SamplingConfig,
}

impl FrameSampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Nominal sample times for a clip of `duration` seconds
    ///
    /// With window fractions `a..b`, start = a·D and end = b·D:
    /// - `count == 0` → empty
    /// - `count == 1` → `[start]`
    /// - otherwise `start + i·(end − start)/(count − 1)` for `i in 0..count`
    ///
    /// Times are non-decreasing and lie in `[a·D, b·D]`.
    pub fn sample_times(&self, duration: f64, count: usize) -> Result<Vec<f64>, AnalysisError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(AnalysisError::InvalidDuration(duration));
        }

        let start = self.config.window_start * duration;
        let end = self.config.window_end * duration;

        let times = match count {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (end - start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            end
                        } else {
                            start + i as f64 * step
                        }
                    })
                    .collect()
            }
        };

        Ok(times)
    }

    /// Position actually requested from the source for nominal time `time`
    ///
    /// Clamped to `[0, max(0, duration − 0.01)]` so the source is never asked
    /// for the very last instant.
    pub fn seek_position(duration: f64, time: f64) -> f64 {
        let upper = (duration - END_GUARD_SECONDS).max(0.0);
        time.max(0.0).min(upper)
    }

    /// Acquire the frame for one sample time
    pub async fn acquire(
        &self,
        source: &dyn FrameSource,
        duration: f64,
        time: f64,
        run: &RunHandle,
    ) -> Result<SampledFrame, AnalysisError> {
        let position = Self::seek_position(duration, time);

        match bounded_wait(
            "seek",
            self.config.seek_timeout(),
            run.token(),
            source.seek(position),
        )
        .await
        {
            WaitOutcome::Completed(Ok(frame)) => {
                debug!(time, position, "Frame acquired");
                Ok(SampledFrame {
                    time,
                    frame: Some(frame),
                    timed_out: false,
                })
            }
            WaitOutcome::Completed(Err(source_error)) => Err(AnalysisError::Seek {
                time,
                source: source_error,
            }),
            WaitOutcome::TimedOut => {
                let fallback = source.current_frame();
                warn!(
                    time,
                    timeout_ms = self.config.seek_timeout_ms,
                    has_fallback = fallback.is_some(),
                    "Seek timed out, using current frame"
                );
                Ok(SampledFrame {
                    time,
                    frame: fallback,
                    timed_out: true,
                })
            }
            WaitOutcome::Cancelled => Err(AnalysisError::Cancelled {
                run_id: run.id().value(),
            }),
        }
    }

    /// Acquire frames for every time in `times`, in order
    ///
    /// `on_frame(index, frame)` is called after each acquisition so callers
    /// can record progress. Stops at the first fatal error; frames already
    /// reported through `on_frame` are the partial result.
    pub async fn acquire_all<F>(
        &self,
        source: &dyn FrameSource,
        duration: f64,
        times: &[f64],
        run: &RunHandle,
        mut on_frame: F,
    ) -> Result<Vec<SampledFrame>, AnalysisError>
    where
        F: FnMut(usize, &SampledFrame),
    {
        let mut frames = Vec::with_capacity(times.len());

        for (index, &time) in times.iter().enumerate() {
            let sampled = self.acquire(source, duration, time, run).await?;
            on_frame(index, &sampled);
            frames.push(sampled);
        }

        Ok(frames)
    }
}
