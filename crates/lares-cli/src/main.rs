//! Lares CLI - Command line interface for the Lares usage-pattern mining engine

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lares_core::error::ConfigError;
use lares_core::record::{Device, Feedback, Home, SecurityEvent};
use lares_mining::store::{load_records, JsonlStore};
use lares_mining::{report, PatternMiner};

use lares_cli::config::{Config, LoggingConfig};
use lares_cli::{load_config, output};

#[derive(Parser)]
#[command(name = "lares")]
#[command(author = "Lares Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Lares - Smart-home usage pattern mining", long_about = None)]
struct Cli {
    /// Path to configuration file (YAML or TOML)
    #[arg(short, long, global = true, env = "LARES_CONFIG")]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine association rules from a usage snapshot
    Mine {
        /// Usage snapshot (JSONL), defaults to snapshots.usage
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Minimum support threshold override
        #[arg(long)]
        min_support: Option<f64>,

        /// Minimum confidence threshold override
        #[arg(long)]
        min_confidence: Option<f64>,

        /// Window width override in minutes
        #[arg(long)]
        window_minutes: Option<i64>,

        /// Minimum viable event count override
        #[arg(long)]
        min_events: Option<usize>,
    },

    /// Per-device usage counts and total hours
    Frequency {
        /// Usage snapshot (JSONL)
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Device snapshot (JSONL)
        #[arg(short, long)]
        devices: Option<PathBuf>,

        /// Home snapshot (JSONL)
        #[arg(long)]
        homes: Option<PathBuf>,
    },

    /// Usage counts per device and hour of day
    Timeframe {
        /// Usage snapshot (JSONL)
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Device snapshot (JSONL)
        #[arg(short, long)]
        devices: Option<PathBuf>,
    },

    /// Per-home usage next to floor area, with correlation
    AreaImpact {
        /// Usage snapshot (JSONL)
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Device snapshot (JSONL)
        #[arg(short, long)]
        devices: Option<PathBuf>,

        /// Home snapshot (JSONL)
        #[arg(long)]
        homes: Option<PathBuf>,
    },

    /// Security event severity summary per home
    Security {
        /// Security event snapshot (JSONL)
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Home snapshot (JSONL)
        #[arg(long)]
        homes: Option<PathBuf>,
    },

    /// Feedback rating and response summary per type and month
    Feedback {
        /// Feedback snapshot (JSONL)
        #[arg(short, long)]
        feedback: Option<PathBuf>,
    },

    /// Devices with anomalous usage counts
    Anomalies {
        /// Usage snapshot (JSONL)
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Device snapshot (JSONL)
        #[arg(short, long)]
        devices: Option<PathBuf>,

        /// Z-score threshold; values at or beyond it are flagged
        #[arg(long, default_value = "2.0")]
        threshold: f64,
    },
}

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    if config.format == "json" {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Pick the explicit path, falling back to the configured default.
fn resolve(arg: Option<PathBuf>, configured: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    arg.or_else(|| configured.clone()).ok_or_else(|| {
        anyhow::anyhow!("no {what} snapshot given; pass a path or set it in the config file")
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Mine {
            events,
            min_support,
            min_confidence,
            window_minutes,
            min_events,
        } => {
            let path = resolve(events, &config.snapshots.usage, "usage")?;
            let mut params = config.mining.clone();
            if let Some(v) = min_support {
                params = params.with_min_support(v);
            }
            if let Some(v) = min_confidence {
                params = params.with_min_confidence(v);
            }
            if let Some(v) = window_minutes {
                params = params.with_window_minutes(v);
            }
            if let Some(v) = min_events {
                params = params.with_min_events(v);
            }

            let miner = PatternMiner::new(Arc::new(JsonlStore::new(path))).with_params(params);
            let outcome = miner.mine().await?;
            if cli.json {
                output::print_json(&outcome)?;
            } else {
                output::print_outcome(&outcome);
            }
        }

        Commands::Frequency {
            events,
            devices,
            homes,
        } => {
            let (usage, devices, homes) = load_usage_joins(&config, events, devices, homes)?;
            let rows = report::usage_frequency(&devices, &homes, &usage);
            info!(rows = rows.len(), "frequency report ready");
            if cli.json {
                output::print_json(&rows)?;
            } else {
                output::print_frequency(&rows);
            }
        }

        Commands::Timeframe { events, devices } => {
            let usage = load_records(resolve(events, &config.snapshots.usage, "usage")?)?;
            let devices: Vec<Device> =
                load_records(resolve(devices, &config.snapshots.devices, "device")?)?;
            let rows = report::usage_timeframe(&devices, &usage);
            if cli.json {
                output::print_json(&rows)?;
            } else {
                output::print_timeframe(&rows);
            }
        }

        Commands::AreaImpact {
            events,
            devices,
            homes,
        } => {
            let (usage, devices, homes) = load_usage_joins(&config, events, devices, homes)?;
            let rows = report::home_area_impact(&homes, &devices, &usage);
            let correlation = report::area_usage_correlation(&rows);
            if cli.json {
                #[derive(serde::Serialize)]
                struct AreaImpactReport {
                    rows: Vec<report::AreaImpactRow>,
                    correlation: Option<f64>,
                }
                output::print_json(&AreaImpactReport { rows, correlation })?;
            } else {
                output::print_area_impact(&rows, correlation);
            }
        }

        Commands::Security { events, homes } => {
            let events: Vec<SecurityEvent> =
                load_records(resolve(events, &config.snapshots.security, "security")?)?;
            let homes: Vec<Home> = load_records(resolve(homes, &config.snapshots.homes, "home")?)?;
            let rows = report::security_summary(&homes, &events);
            if cli.json {
                output::print_json(&rows)?;
            } else {
                output::print_security(&rows);
            }
        }

        Commands::Feedback { feedback } => {
            let entries: Vec<Feedback> =
                load_records(resolve(feedback, &config.snapshots.feedback, "feedback")?)?;
            let rows = report::feedback_summary(&entries);
            if cli.json {
                output::print_json(&rows)?;
            } else {
                output::print_feedback(&rows);
            }
        }

        Commands::Anomalies {
            events,
            devices,
            threshold,
        } => {
            if !(threshold > 0.0) {
                return Err(ConfigError::NonPositiveThreshold { value: threshold }.into());
            }
            let usage = load_records(resolve(events, &config.snapshots.usage, "usage")?)?;
            let devices: Vec<Device> =
                load_records(resolve(devices, &config.snapshots.devices, "device")?)?;
            let rows = report::usage_count_anomalies(&devices, &usage, threshold);
            if cli.json {
                output::print_json(&rows)?;
            } else {
                output::print_anomalies(&rows, threshold);
            }
        }
    }

    Ok(())
}

type UsageJoins = (
    Vec<lares_core::record::UsageEvent>,
    Vec<Device>,
    Vec<Home>,
);

fn load_usage_joins(
    config: &Config,
    events: Option<PathBuf>,
    devices: Option<PathBuf>,
    homes: Option<PathBuf>,
) -> Result<UsageJoins> {
    let usage = load_records(resolve(events, &config.snapshots.usage, "usage")?)?;
    let devices = load_records(resolve(devices, &config.snapshots.devices, "device")?)?;
    let homes = load_records(resolve(homes, &config.snapshots.homes, "home")?)?;
    Ok((usage, devices, homes))
}
