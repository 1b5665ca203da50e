//! Analysis workflow
//!
//! - `pipeline`: stage sequencing, status state machine, progress events
//! - `run_registry`: run identity, supersession and stale-result rejection

pub mod pipeline;
pub mod run_registry;

pub use pipeline::{analyze, SwingAnalyzer};
pub use run_registry::{RunHandle, RunId, RunRegistry};
