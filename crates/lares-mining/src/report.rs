//! Aggregation reports over snapshot records.
//!
//! Each report joins the relevant snapshot tables in memory, groups, and
//! returns plain row vectors in a documented, deterministic order. Rows
//! serialize directly to the JSON the reporting layer emits.
//!
//! Duration-based reports only consider closed usage intervals.
//! Count-based reports (timeframe, anomalies) consider every event, open
//! or closed.

use crate::stats::{self, StdMode};
use chrono::{Datelike, Timelike};
use indexmap::IndexMap;
use lares_core::record::{Device, Feedback, Home, SecurityEvent, Severity, UsageEvent};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Per-device usage totals, most used first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceFrequencyRow {
    pub device_id: u64,
    pub device_name: String,
    pub category_name: String,
    pub home_id: u64,
    pub square_meters: f64,
    pub usage_count: u64,
    pub total_hours: f64,
}

/// Usage counts per device and hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceHourRow {
    pub device_id: u64,
    pub device_name: String,
    pub category_name: String,
    /// Hour of the event start in UTC, 0..=23.
    pub hour_of_day: u32,
    pub usage_count: u64,
}

/// Per-home, per-device usage next to the home's floor area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaImpactRow {
    pub home_id: u64,
    pub home_name: String,
    pub square_meters: f64,
    pub num_rooms: u32,
    pub device_id: u64,
    pub device_name: String,
    pub usage_count: u64,
    pub total_hours: f64,
}

/// Security posture of one home.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecuritySummaryRow {
    pub home_id: u64,
    pub home_name: String,
    pub total_events: u64,
    pub unresolved_events: u64,
    pub high_severity: u64,
    pub medium_severity: u64,
    pub low_severity: u64,
}

/// Feedback volume and ratings for one type in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummaryRow {
    pub feedback_type: String,
    pub year: i32,
    pub month: u32,
    /// Mean over rated entries only; `None` when nothing was rated.
    pub average_rating: Option<f64>,
    pub total: u64,
    pub responded: u64,
}

/// A device whose usage count sits unusually far from the fleet mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageAnomaly {
    pub device_id: u64,
    pub device_name: String,
    pub usage_count: u64,
    pub z_score: f64,
}

#[derive(Default)]
struct UsageAccum {
    count: u64,
    hours: f64,
}

/// Usage count and total hours per device, sorted by count descending.
///
/// Only closed intervals contribute; a device whose every event is still
/// open does not appear. Devices missing from the device snapshot, or
/// whose home is missing, are skipped rather than reported half-joined.
pub fn usage_frequency(
    devices: &[Device],
    homes: &[Home],
    usage: &[UsageEvent],
) -> Vec<DeviceFrequencyRow> {
    let device_index: FxHashMap<u64, &Device> =
        devices.iter().map(|d| (d.device_id, d)).collect();
    let home_index: FxHashMap<u64, &Home> = homes.iter().map(|h| (h.home_id, h)).collect();

    let mut grouped: IndexMap<u64, UsageAccum> = IndexMap::new();
    for event in usage.iter().filter(|e| e.is_closed()) {
        let accum = grouped.entry(event.device_id).or_default();
        accum.count += 1;
        accum.hours += event.duration_hours();
    }

    let mut rows: Vec<DeviceFrequencyRow> = grouped
        .into_iter()
        .filter_map(|(device_id, accum)| {
            let device = device_index.get(&device_id)?;
            let home = home_index.get(&device.home_id)?;
            Some(DeviceFrequencyRow {
                device_id,
                device_name: device.device_name.clone(),
                category_name: device.category_name.clone(),
                home_id: home.home_id,
                square_meters: home.square_meters,
                usage_count: accum.count,
                total_hours: accum.hours,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then(a.device_id.cmp(&b.device_id))
    });
    rows
}

/// Usage counts per `(device, hour of day)`, sorted by device then hour.
///
/// Counts every event; the hour comes from `start_time` in UTC.
pub fn usage_timeframe(devices: &[Device], usage: &[UsageEvent]) -> Vec<DeviceHourRow> {
    let device_index: FxHashMap<u64, &Device> =
        devices.iter().map(|d| (d.device_id, d)).collect();

    let mut grouped: IndexMap<(u64, u32), u64> = IndexMap::new();
    for event in usage {
        if !device_index.contains_key(&event.device_id) {
            continue;
        }
        *grouped
            .entry((event.device_id, event.start_time.hour()))
            .or_insert(0) += 1;
    }

    let mut rows: Vec<DeviceHourRow> = grouped
        .into_iter()
        .map(|((device_id, hour_of_day), usage_count)| {
            let device = device_index[&device_id];
            DeviceHourRow {
                device_id,
                device_name: device.device_name.clone(),
                category_name: device.category_name.clone(),
                hour_of_day,
                usage_count,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.device_id
            .cmp(&b.device_id)
            .then(a.hour_of_day.cmp(&b.hour_of_day))
    });
    rows
}

/// Per-home, per-device usage rows ordered by floor area ascending.
///
/// Closed intervals only, like [`usage_frequency`].
pub fn home_area_impact(
    homes: &[Home],
    devices: &[Device],
    usage: &[UsageEvent],
) -> Vec<AreaImpactRow> {
    let device_index: FxHashMap<u64, &Device> =
        devices.iter().map(|d| (d.device_id, d)).collect();
    let home_index: FxHashMap<u64, &Home> = homes.iter().map(|h| (h.home_id, h)).collect();

    let mut grouped: IndexMap<(u64, u64), UsageAccum> = IndexMap::new();
    for event in usage.iter().filter(|e| e.is_closed()) {
        let Some(device) = device_index.get(&event.device_id) else {
            continue;
        };
        if !home_index.contains_key(&device.home_id) {
            continue;
        }
        let accum = grouped
            .entry((device.home_id, event.device_id))
            .or_default();
        accum.count += 1;
        accum.hours += event.duration_hours();
    }

    let mut rows: Vec<AreaImpactRow> = grouped
        .into_iter()
        .map(|((home_id, device_id), accum)| {
            let home = home_index[&home_id];
            let device = device_index[&device_id];
            AreaImpactRow {
                home_id,
                home_name: home.home_name.clone(),
                square_meters: home.square_meters,
                num_rooms: home.num_rooms,
                device_id,
                device_name: device.device_name.clone(),
                usage_count: accum.count,
                total_hours: accum.hours,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.square_meters
            .total_cmp(&b.square_meters)
            .then(a.home_id.cmp(&b.home_id))
            .then(a.device_id.cmp(&b.device_id))
    });
    rows
}

/// Pearson correlation between floor area and usage count across the
/// impact rows. `None` when fewer than two rows or either column is
/// constant.
pub fn area_usage_correlation(rows: &[AreaImpactRow]) -> Option<f64> {
    let areas: Vec<f64> = rows.iter().map(|r| r.square_meters).collect();
    let counts: Vec<f64> = rows.iter().map(|r| r.usage_count as f64).collect();
    stats::pearson(&areas, &counts)
}

/// Security event counts per home, busiest first.
///
/// Every home appears, including homes with no events at all; their
/// counters are zero.
pub fn security_summary(homes: &[Home], events: &[SecurityEvent]) -> Vec<SecuritySummaryRow> {
    #[derive(Default)]
    struct SecurityAccum {
        total: u64,
        unresolved: u64,
        high: u64,
        medium: u64,
        low: u64,
    }

    let mut grouped: FxHashMap<u64, SecurityAccum> = FxHashMap::default();
    for event in events {
        let accum = grouped.entry(event.home_id).or_default();
        accum.total += 1;
        if !event.resolved {
            accum.unresolved += 1;
        }
        match event.severity {
            Severity::High => accum.high += 1,
            Severity::Medium => accum.medium += 1,
            Severity::Low => accum.low += 1,
        }
    }

    let mut rows: Vec<SecuritySummaryRow> = homes
        .iter()
        .map(|home| {
            let accum = grouped.remove(&home.home_id).unwrap_or_default();
            SecuritySummaryRow {
                home_id: home.home_id,
                home_name: home.home_name.clone(),
                total_events: accum.total,
                unresolved_events: accum.unresolved,
                high_severity: accum.high,
                medium_severity: accum.medium,
                low_severity: accum.low,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_events
            .cmp(&a.total_events)
            .then(a.home_id.cmp(&b.home_id))
    });
    rows
}

/// Feedback volume, response counts and mean rating per type and month.
pub fn feedback_summary(feedback: &[Feedback]) -> Vec<FeedbackSummaryRow> {
    #[derive(Default)]
    struct FeedbackAccum {
        total: u64,
        responded: u64,
        rating_sum: u64,
        rated: u64,
    }

    let mut grouped: IndexMap<(String, i32, u32), FeedbackAccum> = IndexMap::new();
    for entry in feedback {
        let key = (
            entry.feedback_type.clone(),
            entry.created_at.year(),
            entry.created_at.month(),
        );
        let accum = grouped.entry(key).or_default();
        accum.total += 1;
        if entry.responded {
            accum.responded += 1;
        }
        if let Some(rating) = entry.rating {
            accum.rating_sum += u64::from(rating);
            accum.rated += 1;
        }
    }

    let mut rows: Vec<FeedbackSummaryRow> = grouped
        .into_iter()
        .map(|((feedback_type, year, month), accum)| FeedbackSummaryRow {
            feedback_type,
            year,
            month,
            average_rating: (accum.rated > 0)
                .then(|| accum.rating_sum as f64 / accum.rated as f64),
            total: accum.total,
            responded: accum.responded,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then(a.month.cmp(&b.month))
            .then_with(|| a.feedback_type.cmp(&b.feedback_type))
    });
    rows
}

/// Devices whose total usage count is a z-score outlier, strongest first.
///
/// The distribution is taken over devices with at least one event; the
/// comparison is inclusive, matching [`stats::zscore_flags`].
pub fn usage_count_anomalies(
    devices: &[Device],
    usage: &[UsageEvent],
    threshold: f64,
) -> Vec<UsageAnomaly> {
    let device_index: FxHashMap<u64, &Device> =
        devices.iter().map(|d| (d.device_id, d)).collect();

    let mut counts: FxHashMap<u64, u64> = FxHashMap::default();
    for event in usage {
        if device_index.contains_key(&event.device_id) {
            *counts.entry(event.device_id).or_insert(0) += 1;
        }
    }

    let mut series: Vec<(u64, u64)> = counts.into_iter().collect();
    series.sort_unstable_by_key(|&(device_id, _)| device_id);
    let values: Vec<f64> = series.iter().map(|&(_, count)| count as f64).collect();

    let mean = stats::mean(&values).unwrap_or(0.0);
    let std = stats::std_dev(&values, StdMode::Population).unwrap_or(0.0);

    let mut anomalies: Vec<UsageAnomaly> = stats::zscore_flags(&values, threshold)
        .into_iter()
        .map(|idx| {
            let (device_id, usage_count) = series[idx];
            UsageAnomaly {
                device_id,
                device_name: device_index[&device_id].device_name.clone(),
                usage_count,
                z_score: stats::zscore(usage_count as f64, mean, std),
            }
        })
        .collect();
    anomalies.sort_by(|a, b| {
        b.z_score
            .abs()
            .total_cmp(&a.z_score.abs())
            .then(a.device_id.cmp(&b.device_id))
    });
    anomalies
}
