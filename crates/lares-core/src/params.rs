//! Mining request parameters.
//!
//! A [`MiningParams`] value travels with each request and is validated once
//! at the engine boundary. Defaults mirror the production analytics
//! pipeline: 15-minute co-occurrence windows, 10% minimum support, 50%
//! minimum confidence, and at least 10 events before mining is attempted.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default minimum support threshold for frequent itemsets.
pub const DEFAULT_MIN_SUPPORT: f64 = 0.1;

/// Default minimum confidence threshold for association rules.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Default co-occurrence window width in minutes.
pub const DEFAULT_WINDOW_MINUTES: i64 = 15;

/// Default minimum number of usage events required before mining runs.
pub const DEFAULT_MIN_EVENTS: usize = 10;

/// Tunable thresholds for one mining request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningParams {
    /// Minimum fraction of baskets an itemset must appear in, within (0, 1].
    pub min_support: f64,
    /// Minimum confidence an association rule must reach, within (0, 1].
    pub min_confidence: f64,
    /// Co-occurrence window width in whole minutes.
    pub window_minutes: i64,
    /// Minimum number of usage events for a viable mining run.
    pub min_events: usize,
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            window_minutes: DEFAULT_WINDOW_MINUTES,
            min_events: DEFAULT_MIN_EVENTS,
        }
    }
}

impl MiningParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_window_minutes(mut self, minutes: i64) -> Self {
        self.window_minutes = minutes;
        self
    }

    pub fn with_min_events(mut self, min_events: usize) -> Self {
        self.min_events = min_events;
        self
    }

    /// Window width as a [`chrono::Duration`].
    pub fn granularity(&self) -> Duration {
        Duration::minutes(self.window_minutes)
    }

    /// Check every threshold, reporting the first violation.
    ///
    /// NaN thresholds fail the range comparison and are rejected like any
    /// other out-of-range value.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange {
                name: "min_support",
                value: self.min_support,
            });
        }
        if !(self.min_confidence > 0.0 && self.min_confidence <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange {
                name: "min_confidence",
                value: self.min_confidence,
            });
        }
        if self.window_minutes <= 0 {
            return Err(ConfigError::NonPositiveGranularity {
                minutes: self.window_minutes,
            });
        }
        if self.min_events == 0 {
            return Err(ConfigError::ZeroMinEvents);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Defaults
    // ========================================================================

    #[test]
    fn defaults_match_production_pipeline() {
        let params = MiningParams::default();
        assert_eq!(params.min_support, 0.1);
        assert_eq!(params.min_confidence, 0.5);
        assert_eq!(params.window_minutes, 15);
        assert_eq!(params.min_events, 10);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn granularity_converts_minutes() {
        let params = MiningParams::new().with_window_minutes(30);
        assert_eq!(params.granularity(), Duration::minutes(30));
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn rejects_zero_support() {
        let err = MiningParams::new().with_min_support(0.0).validate();
        assert_eq!(
            err,
            Err(ConfigError::ThresholdOutOfRange {
                name: "min_support",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_support_above_one() {
        assert!(MiningParams::new().with_min_support(1.5).validate().is_err());
    }

    #[test]
    fn accepts_support_of_exactly_one() {
        assert!(MiningParams::new().with_min_support(1.0).validate().is_ok());
    }

    #[test]
    fn rejects_nan_confidence() {
        let err = MiningParams::new()
            .with_min_confidence(f64::NAN)
            .validate();
        assert!(matches!(
            err,
            Err(ConfigError::ThresholdOutOfRange {
                name: "min_confidence",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_window() {
        assert_eq!(
            MiningParams::new().with_window_minutes(0).validate(),
            Err(ConfigError::NonPositiveGranularity { minutes: 0 })
        );
        assert!(MiningParams::new().with_window_minutes(-5).validate().is_err());
    }

    #[test]
    fn rejects_zero_min_events() {
        assert_eq!(
            MiningParams::new().with_min_events(0).validate(),
            Err(ConfigError::ZeroMinEvents)
        );
    }

    #[test]
    fn error_messages_name_the_offending_value() {
        let err = MiningParams::new()
            .with_min_support(2.0)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "min_support must lie within (0, 1], got 2");
    }

    // ========================================================================
    // Serde
    // ========================================================================

    #[test]
    fn deserializes_with_partial_fields() {
        let params: MiningParams = serde_json::from_str(r#"{"min_support": 0.25}"#).unwrap();
        assert_eq!(params.min_support, 0.25);
        assert_eq!(params.min_confidence, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(params.window_minutes, DEFAULT_WINDOW_MINUTES);
    }
}
