//! Snapshot record types.
//!
//! These are the read-only rows the mining and reporting layers consume.
//! An analysis request fetches one immutable snapshot from the event store
//! and never mutates it; every record here is a plain value with serde
//! support for the JSONL snapshot format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single device-usage event.
///
/// `start_time` is always present and drives window bucketing. An absent
/// `end_time` marks the event as still open; wherever a closed interval is
/// required, `start_time` stands in for the missing end and the event
/// contributes zero duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub usage_id: u64,
    pub device_id: u64,
    /// Account that operated the device. Baskets never mix actors.
    pub actor_id: u64,
    pub device_name: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl UsageEvent {
    pub fn new(
        usage_id: u64,
        device_id: u64,
        actor_id: u64,
        device_name: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            usage_id,
            device_id,
            actor_id,
            device_name: device_name.into(),
            start_time,
            end_time: None,
        }
    }

    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Whether the usage interval has been closed.
    pub fn is_closed(&self) -> bool {
        self.end_time.is_some()
    }

    /// End of the usage interval, substituting `start_time` when open.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_time.unwrap_or(self.start_time)
    }

    /// Interval length in fractional hours. Open events report zero.
    pub fn duration_hours(&self) -> f64 {
        let millis = (self.effective_end() - self.start_time).num_milliseconds();
        millis.max(0) as f64 / 3_600_000.0
    }
}

/// A registered device, joined into usage reports by `device_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: u64,
    pub home_id: u64,
    pub device_name: String,
    pub category_name: String,
}

impl Device {
    pub fn new(
        device_id: u64,
        home_id: u64,
        device_name: impl Into<String>,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            device_id,
            home_id,
            device_name: device_name.into(),
            category_name: category_name.into(),
        }
    }
}

/// A registered home with the floor-area fields the impact report uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub home_id: u64,
    pub home_name: String,
    pub square_meters: f64,
    pub num_rooms: u32,
}

impl Home {
    pub fn new(home_id: u64, home_name: impl Into<String>, square_meters: f64, num_rooms: u32) -> Self {
        Self {
            home_id,
            home_name: home_name.into(),
            square_meters,
            num_rooms,
        }
    }
}

/// Severity grade of a security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// A security event raised for a home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub event_id: u64,
    pub home_id: u64,
    pub severity: Severity,
    pub resolved: bool,
    pub event_time: DateTime<Utc>,
}

impl SecurityEvent {
    pub fn new(
        event_id: u64,
        home_id: u64,
        severity: Severity,
        resolved: bool,
        event_time: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            home_id,
            severity,
            resolved,
            event_time,
        }
    }
}

/// A user feedback entry, grouped monthly by the feedback report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: u64,
    pub actor_id: u64,
    pub feedback_type: String,
    /// Star rating, absent when the user left only free text.
    #[serde(default)]
    pub rating: Option<u8>,
    pub responded: bool,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(
        feedback_id: u64,
        actor_id: u64,
        feedback_type: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            feedback_id,
            actor_id,
            feedback_type: feedback_type.into(),
            rating: None,
            responded: false,
            created_at,
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_responded(mut self, responded: bool) -> Self {
        self.responded = responded;
        self
    }
}
