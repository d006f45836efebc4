// ── Chart aggregation ──
//
// Pure functions over normalized records. Same records in, same
// aggregates out; nothing here touches the network or mutates state.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::period::Period;
use crate::model::record::{LogLevel, LogRecord};
use crate::model::series::{LevelCount, TimeBucket};

/// Count records per severity level.
///
/// Output is in canonical INFO, WARN, ERROR order regardless of input
/// order; levels with zero records are omitted entirely. Empty input
/// yields an empty result.
pub fn level_distribution(records: &[LogRecord]) -> Vec<LevelCount> {
    let mut counts: HashMap<LogLevel, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.level).or_default() += 1;
    }

    LogLevel::ALL
        .into_iter()
        .filter_map(|level| {
            counts.get(&level).map(|&count| LevelCount { level, count })
        })
        .collect()
}

/// Bucket records into a stacked time series for the given period.
///
/// Buckets are labeled by `Period::bucket_label` and returned in
/// chronological order. Only buckets that actually contain records
/// appear; gaps are not zero-filled.
pub fn time_series(records: &[LogRecord], period: Period) -> Vec<TimeBucket> {
    let mut buckets: HashMap<String, TimeBucket> = HashMap::new();

    for record in records {
        let label = period.bucket_label(record.timestamp);
        buckets
            .entry(label.clone())
            .or_insert_with(|| TimeBucket::new(label))
            .add(record.level);
    }

    let mut series: Vec<TimeBucket> = buckets.into_values().collect();
    match period {
        // Hourly labels are zero-padded, so label order is time order.
        Period::Day => series.sort_by(|a, b| a.label.cmp(&b.label)),
        // Date labels sort by the parsed date, not the string.
        Period::Week | Period::Month => {
            series.sort_by_key(|b| NaiveDate::parse_from_str(&b.label, "%Y-%m-%d").ok());
        }
    }
    series
}
