// ── Log records and severity levels ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a log record.
///
/// Usually the backend's document id; records that arrive without one
/// get a synthetic id assigned at ingestion (see `convert`). Identity
/// is what the feed deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Severity of a log record.
///
/// The backend emits `WARNING` for warn-level entries; it parses to
/// `Warn`. Levels outside this set are unrecognized and records
/// carrying them are dropped at ingestion rather than misfiled.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Info,
    #[strum(serialize = "WARNING", to_string = "WARN")]
    Warn,
    Error,
}

impl LogLevel {
    /// All levels in canonical display order.
    pub const ALL: [LogLevel; 3] = [LogLevel::Info, LogLevel::Warn, LogLevel::Error];

    /// Parse a wire-format level, `None` if unrecognized.
    pub fn from_wire(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

/// A normalized log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub host: Option<String>,
    pub keyword: Option<String>,
}
