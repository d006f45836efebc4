// ── API-to-domain conversions ──
//
// Bridges raw `loglook_api` entries into canonical `LogRecord`s. This
// is the single ingestion boundary: entries without a parseable
// timestamp or a recognized level are dropped here, so everything
// downstream can treat records as well-formed.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use loglook_api::RawLogEntry;

use crate::model::record::{LogLevel, LogRecord, RecordId};

/// How much of the message participates in a synthetic id.
const SYNTHETIC_ID_PREFIX_LEN: usize = 24;

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a backend timestamp.
///
/// The backend emits UTC, but not always with an offset suffix; naive
/// values are taken as UTC rather than rejected.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Deterministic stand-in id for entries the backend sent without one.
///
/// Timestamp plus a message prefix: two entries colliding on both are
/// treated as the same record, which is what the feed's deduplication
/// wants anyway.
fn synthetic_id(timestamp: DateTime<Utc>, message: &str) -> RecordId {
    let prefix: String = message.chars().take(SYNTHETIC_ID_PREFIX_LEN).collect();
    RecordId::new(format!("{}:{prefix}", timestamp.timestamp_millis()))
}

// ── Entry normalization ─────────────────────────────────────────────

/// Normalize one wire entry, or drop it.
///
/// Returns `None` when the level is unrecognized or the timestamp does
/// not parse. Dropping beats misfiling: a record counted under a
/// guessed level would corrupt every aggregate built from it.
pub fn normalize(entry: RawLogEntry) -> Option<LogRecord> {
    let Some(level) = LogLevel::from_wire(&entry.log_level) else {
        debug!(level = %entry.log_level, "dropping entry with unrecognized level");
        return None;
    };

    let Some(timestamp) = parse_timestamp(&entry.message_timestamp) else {
        debug!(raw = %entry.message_timestamp, "dropping entry with unparseable timestamp");
        return None;
    };

    let message = entry.message.unwrap_or_default();

    let id = if entry.id.trim().is_empty() {
        synthetic_id(timestamp, &message)
    } else {
        RecordId::new(entry.id)
    };

    Some(LogRecord {
        id,
        timestamp,
        level,
        message,
        host: entry.host_name,
        keyword: entry.keyword,
    })
}

/// Normalize a whole page, dropping malformed entries.
pub fn normalize_page(entries: Vec<RawLogEntry>) -> Vec<LogRecord> {
    entries.into_iter().filter_map(normalize).collect()
}
