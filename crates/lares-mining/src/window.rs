//! Time-window bucketing
//!
//! Events are assigned to fixed-width, right-open windows by flooring their
//! timestamp onto a granularity grid anchored at the Unix epoch. The window
//! key is a pure function of timestamp and granularity, so re-bucketing the
//! same snapshot always yields identical windows regardless of event order.

use chrono::{DateTime, Duration, Utc};
use lares_core::error::{ConfigError, ConfigResult};

/// Start of a right-open window `[key, key + granularity)`.
pub type WindowKey = DateTime<Utc>;

/// Deterministic bucketizer for a fixed granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    granularity_ms: i64,
}

impl WindowSpec {
    /// Create a bucketizer. Granularities of zero or less are rejected.
    pub fn new(granularity: Duration) -> ConfigResult<Self> {
        let granularity_ms = granularity.num_milliseconds();
        if granularity_ms <= 0 {
            return Err(ConfigError::NonPositiveGranularity {
                minutes: granularity.num_minutes(),
            });
        }
        Ok(Self { granularity_ms })
    }

    /// Fifteen-minute windows, the default basket width.
    pub fn quarter_hour() -> Self {
        Self {
            granularity_ms: 15 * 60 * 1000,
        }
    }

    /// Floor a timestamp onto the window grid, toward negative infinity.
    ///
    /// Pre-epoch timestamps floor downward too: -1ms lands in the window
    /// starting one full granularity before the epoch.
    pub fn floor(&self, t: DateTime<Utc>) -> WindowKey {
        let millis = t.timestamp_millis();
        let floored = millis - millis.rem_euclid(self.granularity_ms);
        // Only reachable if flooring pushes past chrono's representable
        // range; collapse onto the earliest window instead of panicking.
        DateTime::from_timestamp_millis(floored).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether two timestamps land in the same window.
    pub fn same_window(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.floor(a) == self.floor(b)
    }

    pub fn granularity(&self) -> Duration {
        Duration::milliseconds(self.granularity_ms)
    }
}
