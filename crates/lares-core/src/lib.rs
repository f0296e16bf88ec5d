//! # Lares Core
//!
//! Foundational types for the Lares usage-pattern mining engine.
//!
//! This crate defines the record snapshot consumed by the mining and
//! reporting layers, the tunable parameters of a mining request, and the
//! configuration errors shared across the workspace:
//!
//! - **Records**: read-only rows fetched from the event store
//! - **Parameters**: support/confidence thresholds, window width, minimum
//!   viable event count
//! - **Errors**: rejection of invalid parameters before any computation
//!
//! ## Modules
//!
//! - [`record`]: `UsageEvent`, `Device`, `Home`, `SecurityEvent`, `Feedback`
//! - [`params`]: `MiningParams` with validated thresholds
//! - [`error`]: `ConfigError`
//!
//! ## Quick Start
//!
//! ```rust
//! use lares_core::{MiningParams, UsageEvent};
//! use chrono::{TimeZone, Utc};
//!
//! let event = UsageEvent::new(1, 42, 7, "Living Room Lamp", Utc.with_ymd_and_hms(2024, 3, 1, 8, 3, 0).unwrap())
//!     .with_end_time(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
//! assert!(event.is_closed());
//!
//! let params = MiningParams::new().with_min_support(0.2);
//! assert!(params.validate().is_ok());
//! ```

pub mod error;
pub mod params;
pub mod record;

pub use error::{ConfigError, ConfigResult};
pub use params::MiningParams;
pub use record::{Device, Feedback, Home, SecurityEvent, Severity, UsageEvent};
