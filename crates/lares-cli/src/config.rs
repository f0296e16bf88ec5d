//! Configuration file support for Lares
//!
//! Supports both YAML and TOML configuration files.
//!
//! # Example YAML configuration:
//! ```yaml
//! # Lares configuration file
//!
//! # Default snapshot locations, overridable per command
//! snapshots:
//!   usage: /var/lib/lares/usage.jsonl
//!   devices: /var/lib/lares/devices.jsonl
//!   homes: /var/lib/lares/homes.jsonl
//!
//! # Mining thresholds
//! mining:
//!   min_support: 0.1
//!   min_confidence: 0.5
//!   window_minutes: 15
//!   min_events: 10
//!
//! # Logging settings
//! logging:
//!   level: info
//!   format: text
//! ```

use lares_core::params::MiningParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default snapshot file locations
    pub snapshots: SnapshotConfig,

    /// Mining thresholds
    pub mining: MiningParams,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Default snapshot file locations
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SnapshotConfig {
    pub usage: Option<PathBuf>,
    pub devices: Option<PathBuf>,
    pub homes: Option<PathBuf>,
    pub security: Option<PathBuf>,
    pub feedback: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML, auto-detected by extension)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&content),
            "toml" => Self::from_toml(&content),
            _ => {
                // Try YAML first, then TOML
                Self::from_yaml(&content).or_else(|_| Self::from_toml(&content))
            }
        }
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(PathBuf, String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mining.min_support, 0.1);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.snapshots.usage, None);
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
snapshots:
  usage: /var/lib/lares/usage.jsonl
mining:
  min_support: 0.25
  window_minutes: 30
logging:
  level: debug
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(
            config.snapshots.usage,
            Some(PathBuf::from("/var/lib/lares/usage.jsonl"))
        );
        assert_eq!(config.mining.min_support, 0.25);
        assert_eq!(config.mining.window_minutes, 30);
        assert_eq!(config.mining.min_confidence, 0.5, "untouched field keeps default");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_toml_parsing() {
        let toml = r#"
[snapshots]
usage = "/var/lib/lares/usage.jsonl"
devices = "/var/lib/lares/devices.jsonl"

[mining]
min_confidence = 0.7

[logging]
format = "json"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(
            config.snapshots.devices,
            Some(PathBuf::from("/var/lib/lares/devices.jsonl"))
        );
        assert_eq!(config.mining.min_confidence, 0.7);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_yaml_reports_parse_error() {
        let err = Config::from_yaml("mining: [not, a, map]").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
