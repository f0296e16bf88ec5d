//! Event-store boundary.
//!
//! The engine reads one immutable snapshot of usage records per request;
//! this module defines that read path. Fetching is the only suspension
//! point in a mining run, so [`UsageStore`] is the sole async surface of
//! the crate.
//!
//! # Snapshot File Format
//!
//! [`JsonlStore`] reads one JSON record per line. Blank lines and lines
//! starting with `#` or `//` are skipped:
//!
//! ```text
//! # usage snapshot, exported 2024-03-01
//! {"usage_id": 1, "device_id": 4, "actor_id": 7, "device_name": "Lamp", "start_time": "2024-03-01T08:01:00Z"}
//! {"usage_id": 2, "device_id": 9, "actor_id": 7, "device_name": "Thermostat", "start_time": "2024-03-01T08:03:00Z", "end_time": "2024-03-01T08:40:00Z"}
//! ```

use async_trait::async_trait;
use lares_core::record::UsageEvent;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failure to produce a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record at {path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("event store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to usage-event snapshots.
///
/// Implementations must be `Send + Sync`: one store is shared by every
/// concurrent mining request, and each request takes its own independent
/// snapshot.
///
/// # Implementing a Custom Store
///
/// ```rust,ignore
/// use lares_mining::store::{StoreError, UsageStore};
/// use lares_core::UsageEvent;
/// use async_trait::async_trait;
///
/// struct PgStore { pool: sqlx::PgPool }
///
/// #[async_trait]
/// impl UsageStore for PgStore {
///     async fn fetch_usage(&self) -> Result<Vec<UsageEvent>, StoreError> {
///         sqlx::query_as("SELECT ...")
///             .fetch_all(&self.pool)
///             .await
///             .map_err(|e| StoreError::Unavailable(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Fetch one immutable snapshot of usage events.
    ///
    /// Order is not significant; the mining pipeline produces identical
    /// results for any permutation of the same snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backing source cannot be read.
    /// An empty snapshot is not an error.
    async fn fetch_usage(&self) -> StoreResult<Vec<UsageEvent>>;
}

/// In-memory store holding a fixed snapshot. Used by tests and by the
/// CLI after it has loaded a snapshot file itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Vec<UsageEvent>,
}

impl MemoryStore {
    pub fn new(events: Vec<UsageEvent>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[async_trait]
impl UsageStore for MemoryStore {
    async fn fetch_usage(&self) -> StoreResult<Vec<UsageEvent>> {
        Ok(self.events.clone())
    }
}

/// Store backed by a JSONL snapshot file, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UsageStore for JsonlStore {
    async fn fetch_usage(&self) -> StoreResult<Vec<UsageEvent>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        let events = parse_jsonl(&self.path, &content)?;
        debug!(path = %self.path.display(), events = events.len(), "loaded usage snapshot");
        Ok(events)
    }
}

/// Synchronously load a JSONL snapshot of any record type.
///
/// The reporting commands use this for device, home, security and
/// feedback snapshots; the miner goes through [`UsageStore`] instead.
pub fn load_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> StoreResult<Vec<T>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_jsonl(path, &content)
}

/// Parse JSONL content, skipping blanks and comments, reporting the
/// 1-based line number of the first malformed record.
fn parse_jsonl<T: DeserializeOwned>(path: &Path, content: &str) -> StoreResult<Vec<T>> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|e| StoreError::Malformed {
            path: path.to_path_buf(),
            line: idx + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}
