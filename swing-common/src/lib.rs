//! # Swing Common Library
//!
//! Shared code for the swing analysis crates including:
//! - Error type shared by configuration and I/O helpers
//! - Event types (AnalysisEvent enum) and the EventBus
//! - TOML configuration loading and atomic write-back

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
