//! Bounded waits on external collaborators
//!
//! Every call into a frame source or pose estimator is raced against a
//! timeout and the run's cancellation token. Cancellation wins ties.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// How a bounded wait ended
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome<T> {
    /// The operation finished in time
    Completed(T),
    /// The timeout elapsed first; the operation was dropped
    TimedOut,
    /// The run was cancelled first; the operation was dropped
    Cancelled,
}

/// Await `operation` for at most `timeout`, giving up early on cancellation
///
/// # Arguments
/// * `operation_name` - Name for logging (e.g., "seek", "pose estimate")
/// * `timeout` - Maximum time to wait
/// * `cancel` - Run cancellation token
/// * `operation` - Future to await
pub async fn bounded_wait<F>(
    operation_name: &str,
    timeout: Duration,
    cancel: &CancellationToken,
    operation: F,
) -> WaitOutcome<F::Output>
where
    F: Future,
{
    let start_time = Instant::now();

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => WaitOutcome::Cancelled,
        result = tokio::time::timeout(timeout, operation) => match result {
            Ok(value) => WaitOutcome::Completed(value),
            Err(_) => WaitOutcome::TimedOut,
        },
    };

    match &outcome {
        WaitOutcome::Completed(_) => {
            tracing::trace!(
                operation = operation_name,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Bounded wait completed"
            );
        }
        WaitOutcome::TimedOut => {
            tracing::debug!(
                operation = operation_name,
                timeout_ms = timeout.as_millis() as u64,
                "Bounded wait timed out"
            );
        }
        WaitOutcome::Cancelled => {
            tracing::debug!(operation = operation_name, "Bounded wait cancelled");
        }
    }

    outcome
}
