//! Run identity and supersession
//!
//! Every analysis request gets a fresh, strictly increasing [`RunId`].
//! Starting a run cancels whichever run was in flight, and results are only
//! accepted for the latest run. A stale run can therefore never overwrite a
//! newer run's output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Monotonic analysis run identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(u64);

impl RunId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle held by an in-flight run
#[derive(Debug, Clone)]
pub struct RunHandle {
    id: RunId,
    token: CancellationToken,
}

impl RunHandle {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    last_issued: u64,
    latest: Option<RunId>,
    latest_cancelled: bool,
    active_token: Option<CancellationToken>,
}

/// Tracks the latest run and cancels superseded ones
#[derive(Debug, Default)]
pub struct RunRegistry {
    state: Mutex<RegistryState>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // State stays consistent across a panic; every update is a plain assignment
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a new run, cancelling the one in flight (if any)
    pub fn begin_run(&self) -> RunHandle {
        let mut state = self.lock();

        if let Some(previous) = state.active_token.take() {
            previous.cancel();
            if let Some(superseded) = state.latest {
                info!(run_id = %superseded, "Superseding in-flight analysis run");
            }
        }

        state.last_issued += 1;
        let id = RunId(state.last_issued);
        let token = CancellationToken::new();

        state.latest = Some(id);
        state.latest_cancelled = false;
        state.active_token = Some(token.clone());

        debug!(run_id = %id, "Analysis run started");
        RunHandle { id, token }
    }

    /// Latest run, unless it was cancelled
    pub fn current(&self) -> Option<RunId> {
        let state = self.lock();
        if state.latest_cancelled {
            None
        } else {
            state.latest
        }
    }

    /// Whether results of `id` may still be applied
    pub fn is_current(&self, id: RunId) -> bool {
        self.current() == Some(id)
    }

    /// Cancel the latest run without starting another
    ///
    /// Returns the cancelled run, if one was current.
    pub fn cancel_current(&self) -> Option<RunId> {
        let mut state = self.lock();
        if state.latest_cancelled {
            return None;
        }
        let latest = state.latest?;
        state.latest_cancelled = true;
        if let Some(token) = state.active_token.take() {
            token.cancel();
        }
        info!(run_id = %latest, "Analysis run cancelled");
        Some(latest)
    }

    /// Mark a run as no longer in flight
    ///
    /// The run stays current (its results remain acceptable) until another
    /// run begins or it is cancelled.
    pub fn finish(&self, id: RunId) {
        let mut state = self.lock();
        if state.latest == Some(id) {
            state.active_token = None;
        }
    }

    /// Pass `result` through only if `id` is still current
    pub fn accept<T>(&self, id: RunId, result: T) -> Option<T> {
        if self.is_current(id) {
            Some(result)
        } else {
            debug!(run_id = %id, "Discarding result of superseded run");
            None
        }
    }
}
