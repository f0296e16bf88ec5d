//! Lares CLI library - testable configuration and rendering helpers
//!
//! The binary in `main.rs` stays thin; configuration loading and terminal
//! rendering live here where they can be unit tested.

pub mod config;
pub mod output;

use anyhow::Result;
use config::Config;
use std::path::Path;

/// Load the configuration file when one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}
