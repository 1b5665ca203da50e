//! Utility modules for swing-analyzer

pub mod bounded_wait;

pub use bounded_wait::{bounded_wait, WaitOutcome};
