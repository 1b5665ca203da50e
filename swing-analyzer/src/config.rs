//! Configuration for swing-analyzer
//!
//! Priority (highest first):
//! 1. Command-line flags (applied by the binary)
//! 2. Environment overrides (`SWING_SAMPLE_COUNT`, `SWING_MIN_CONFIDENCE`)
//! 3. TOML file (`[analysis]` and `[logging]` sections)
//! 4. Compiled defaults
//!
//! A missing TOML file is not an error; defaults apply and a warning is logged.

use crate::models::JointName;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use swing_common::config::{load_toml_config, LoggingConfig};
use swing_common::{Error, Result};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SWING_ANALYZER_CONFIG";

/// Module name used for the platform default config path
pub const MODULE_NAME: &str = "swing-analyzer";

/// Environment override for `analysis.sampling.sample_count`
pub const SAMPLE_COUNT_ENV_VAR: &str = "SWING_SAMPLE_COUNT";

/// Environment override for `analysis.features.min_confidence`
pub const MIN_CONFIDENCE_ENV_VAR: &str = "SWING_MIN_CONFIDENCE";

/// Which wrist stands in for the club hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HandPreference {
    /// Right wrist, falling back to left
    #[default]
    RightThenLeft,
    /// Left wrist, falling back to right
    LeftThenRight,
    RightOnly,
    LeftOnly,
}

impl HandPreference {
    /// Wrists to try, in order
    pub fn wrist_order(&self) -> &'static [JointName] {
        match self {
            HandPreference::RightThenLeft => &[JointName::RightWrist, JointName::LeftWrist],
            HandPreference::LeftThenRight => &[JointName::LeftWrist, JointName::RightWrist],
            HandPreference::RightOnly => &[JointName::RightWrist],
            HandPreference::LeftOnly => &[JointName::LeftWrist],
        }
    }
}

/// Frame sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Default sample count when the caller does not give one
    pub sample_count: usize,
    /// Window start as a fraction of duration
    pub window_start: f64,
    /// Window end as a fraction of duration
    pub window_end: f64,
    /// Per-seek timeout
    pub seek_timeout_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_count: 16,
            window_start: 0.05,
            window_end: 0.95,
            seek_timeout_ms: 2000,
        }
    }
}

impl SamplingConfig {
    pub fn seek_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_timeout_ms)
    }
}

/// Feature extraction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Keypoints below this confidence are ignored
    pub min_confidence: f64,
    pub hand_preference: HandPreference,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            hand_preference: HandPreference::default(),
        }
    }
}

/// Pose estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Per-frame estimator timeout
    pub estimate_timeout_ms: u64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            estimate_timeout_ms: 2000,
        }
    }
}

impl PoseConfig {
    pub fn estimate_timeout(&self) -> Duration {
        Duration::from_millis(self.estimate_timeout_ms)
    }
}

/// Complete analyzer configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub sampling: SamplingConfig,
    pub features: FeatureConfig,
    pub pose: PoseConfig,
}

impl AnalyzerConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let s = &self.sampling;
        if !(s.window_start.is_finite() && s.window_end.is_finite()) {
            return Err(Error::Config(
                "sampling window bounds must be finite".to_string(),
            ));
        }
        if !(0.0 <= s.window_start && s.window_start < s.window_end && s.window_end <= 1.0) {
            return Err(Error::Config(format!(
                "sampling window must satisfy 0 <= start < end <= 1 (got {}..{})",
                s.window_start, s.window_end
            )));
        }
        if s.seek_timeout_ms == 0 {
            return Err(Error::Config(
                "sampling.seek_timeout_ms must be > 0".to_string(),
            ));
        }

        let min_confidence = self.features.min_confidence;
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(Error::Config(format!(
                "features.min_confidence must be within [0, 1] (got {})",
                min_confidence
            )));
        }

        if self.pose.estimate_timeout_ms == 0 {
            return Err(Error::Config(
                "pose.estimate_timeout_ms must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply `SWING_SAMPLE_COUNT` / `SWING_MIN_CONFIDENCE` if set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_value(SAMPLE_COUNT_ENV_VAR) {
            self.sampling.sample_count = value.parse().map_err(|e| {
                Error::Config(format!("{}={:?} is not a count: {}", SAMPLE_COUNT_ENV_VAR, value, e))
            })?;
            info!(sample_count = self.sampling.sample_count, "Sample count from environment");
        }

        if let Some(value) = env_value(MIN_CONFIDENCE_ENV_VAR) {
            self.features.min_confidence = value.parse().map_err(|e| {
                Error::Config(format!(
                    "{}={:?} is not a number: {}",
                    MIN_CONFIDENCE_ENV_VAR, value, e
                ))
            })?;
            info!(
                min_confidence = self.features.min_confidence,
                "Minimum confidence from environment"
            );
        }

        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// TOML file layout
///
/// ```toml
/// [logging]
/// level = "info"
///
/// [analysis.sampling]
/// sample_count = 16
/// seek_timeout_ms = 2000
///
/// [analysis.features]
/// min_confidence = 0.3
/// hand_preference = "right-then-left"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyzerToml {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analysis: AnalyzerConfig,
}

impl AnalyzerToml {
    /// Load config from `path`, apply environment overrides, validate
    ///
    /// `None` or a nonexistent path yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let config: AnalyzerToml = load_toml_config(path)?;
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Some(path) => {
                warn!(
                    path = %path.display(),
                    "Config file not found, using default configuration"
                );
                AnalyzerToml::default()
            }
            None => {
                info!("No config file, using default configuration");
                AnalyzerToml::default()
            }
        };

        config.analysis.apply_env_overrides()?;
        config.analysis.validate()?;
        Ok(config)
    }
}
