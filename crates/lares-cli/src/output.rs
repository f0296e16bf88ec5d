//! Terminal rendering for mining outcomes and report rows.
//!
//! Every command supports `--json` for machine output; the functions here
//! cover the human-readable default.

use anyhow::Result;
use lares_mining::engine::PatternOutcome;
use lares_mining::report::{
    AreaImpactRow, DeviceFrequencyRow, DeviceHourRow, FeedbackSummaryRow, SecuritySummaryRow,
    UsageAnomaly,
};
use serde::Serialize;

/// Pretty-printed JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_outcome(outcome: &PatternOutcome) {
    match outcome {
        PatternOutcome::Rules(findings) => {
            println!(
                "Mined {} association rule(s) at min_support {}:",
                findings.rules.len(),
                findings.min_support
            );
            println!();
            println!("{:<8} {:<8} {:<8} RULE", "CONF", "LIFT", "SUPP");
            for rule in &findings.rules {
                println!(
                    "{:<8.3} {:<8.3} {:<8.3} {} => {}",
                    rule.confidence, rule.lift, rule.support, rule.antecedents, rule.consequents
                );
            }
        }
        PatternOutcome::Insufficient(reason) => println!("{reason}"),
    }
}

pub fn print_frequency(rows: &[DeviceFrequencyRow]) {
    println!("{:<6} {:<24} {:<16} {:>6} {:>10}", "ID", "DEVICE", "CATEGORY", "USES", "HOURS");
    for row in rows {
        println!(
            "{:<6} {:<24} {:<16} {:>6} {:>10.2}",
            row.device_id, row.device_name, row.category_name, row.usage_count, row.total_hours
        );
    }
}

pub fn print_timeframe(rows: &[DeviceHourRow]) {
    println!("{:<6} {:<24} {:>5} {:>6}", "ID", "DEVICE", "HOUR", "USES");
    for row in rows {
        println!(
            "{:<6} {:<24} {:>5} {:>6}",
            row.device_id, row.device_name, row.hour_of_day, row.usage_count
        );
    }
}

pub fn print_area_impact(rows: &[AreaImpactRow], correlation: Option<f64>) {
    println!(
        "{:<6} {:<18} {:>8} {:<24} {:>6} {:>10}",
        "HOME", "NAME", "SQM", "DEVICE", "USES", "HOURS"
    );
    for row in rows {
        println!(
            "{:<6} {:<18} {:>8.1} {:<24} {:>6} {:>10.2}",
            row.home_id, row.home_name, row.square_meters, row.device_name, row.usage_count,
            row.total_hours
        );
    }
    match correlation {
        Some(r) => println!("\narea/usage correlation: {r:.4}"),
        None => println!("\narea/usage correlation: undefined for this snapshot"),
    }
}

pub fn print_security(rows: &[SecuritySummaryRow]) {
    println!(
        "{:<6} {:<18} {:>6} {:>10} {:>5} {:>7} {:>5}",
        "HOME", "NAME", "TOTAL", "UNRESOLVED", "HIGH", "MEDIUM", "LOW"
    );
    for row in rows {
        println!(
            "{:<6} {:<18} {:>6} {:>10} {:>5} {:>7} {:>5}",
            row.home_id,
            row.home_name,
            row.total_events,
            row.unresolved_events,
            row.high_severity,
            row.medium_severity,
            row.low_severity
        );
    }
}

pub fn print_feedback(rows: &[FeedbackSummaryRow]) {
    println!(
        "{:<20} {:>6} {:>5} {:>7} {:>9} {:>6}",
        "TYPE", "YEAR", "MONTH", "RATING", "RESPONDED", "TOTAL"
    );
    for row in rows {
        let rating = row
            .average_rating
            .map(|r| format!("{r:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:>6} {:>5} {:>7} {:>9} {:>6}",
            row.feedback_type, row.year, row.month, rating, row.responded, row.total
        );
    }
}

pub fn print_anomalies(rows: &[UsageAnomaly], threshold: f64) {
    if rows.is_empty() {
        println!("no devices beyond {threshold} standard deviations");
        return;
    }
    println!("{:<6} {:<24} {:>6} {:>8}", "ID", "DEVICE", "USES", "Z");
    for row in rows {
        println!(
            "{:<6} {:<24} {:>6} {:>8.2}",
            row.device_id, row.device_name, row.usage_count, row.z_score
        );
    }
}
