// ── Chart window periods ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time window for the chart views.
///
/// Doubles as the server query parameter (`day`/`week`/`month`) and as
/// the bucketing rule for time-series aggregation. The window length
/// itself is the server's business; clients only name it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

impl Period {
    /// The `log_time` query parameter value.
    pub fn query_param(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Bucket label for a timestamp under this period.
    ///
    /// Day buckets are hourly (`"14:00"`); week and month buckets are
    /// calendar dates (`"2026-03-01"`). Both formats are zero-padded,
    /// so lexicographic label order is chronological order.
    pub fn bucket_label(self, ts: DateTime<Utc>) -> String {
        match self {
            Self::Day => ts.format("%H:00").to_string(),
            Self::Week | Self::Month => ts.format("%Y-%m-%d").to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn query_param_round_trips() {
        for period in [Period::Day, Period::Week, Period::Month] {
            let parsed: Period = period.query_param().parse().unwrap();
            assert_eq!(parsed, period);
        }
    }

    #[test]
    fn day_buckets_are_hourly() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 42, 7).unwrap();
        assert_eq!(Period::Day.bucket_label(ts), "09:00");
    }

    #[test]
    fn week_and_month_buckets_are_dates() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 42, 7).unwrap();
        assert_eq!(Period::Week.bucket_label(ts), "2026-03-01");
        assert_eq!(Period::Month.bucket_label(ts), "2026-03-01");
    }
}
