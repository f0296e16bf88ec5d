//! Parameter validation errors

use thiserror::Error;

/// Rejection of a mining request before any computation begins.
///
/// Thresholds and window widths are caller inputs, so every variant names
/// the offending value. Data-dependent conditions (too few events, too few
/// devices) are not errors and never appear here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("window granularity must be positive, got {minutes} minutes")]
    NonPositiveGranularity { minutes: i64 },

    #[error("{name} must lie within (0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("minimum viable event count must be at least 1")]
    ZeroMinEvents,

    #[error("anomaly threshold must be positive, got {value}")]
    NonPositiveThreshold { value: f64 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
