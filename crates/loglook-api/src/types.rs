// Wire types for the LogLook backend.
//
// These mirror the JSON the backend actually sends, defaults and all.
// Field coverage is deliberately loose: unknown fields are collected
// into `extra` instead of failing the whole payload.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Log query responses ─────────────────────────────────────────────

/// A single log entry as returned by the recent/mainboard/search endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLogEntry {
    #[serde(default)]
    pub id: String,

    /// Event timestamp. The backend emits naive UTC, sometimes without a
    /// trailing `Z`.
    #[serde(default)]
    pub message_timestamp: String,

    #[serde(default)]
    pub log_level: String,

    #[serde(default)]
    pub keyword: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub host_name: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// The search endpoint answers with either a bare array or a wrapper
/// object, depending on the query path taken server-side.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SearchResponse {
    Bare(Vec<RawLogEntry>),
    Wrapped {
        #[serde(default)]
        results: Vec<RawLogEntry>,
    },
}

impl SearchResponse {
    pub(crate) fn into_entries(self) -> Vec<RawLogEntry> {
        match self {
            Self::Bare(entries) | Self::Wrapped { results: entries } => entries,
        }
    }
}

/// Search query parameters. All filters are optional.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: Option<String>,
    pub keyword: Option<String>,
    pub log_level: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Result cap (`k` on the wire).
    pub limit: Option<u32>,
}

/// A detail-endpoint hit in search-index shape: `{_id, _source}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailHit {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_source")]
    pub source: DetailSource,
}

/// The `_source` document of a detail hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailSource {
    #[serde(default)]
    pub message: Option<String>,

    /// Fallback message body (`event.original`).
    #[serde(default)]
    pub event: Option<DetailEvent>,

    #[serde(default)]
    pub message_timestamp: Option<String>,

    /// Ingest timestamp, used when `message_timestamp` is absent.
    #[serde(default, rename = "@timestamp")]
    pub ingest_timestamp: Option<String>,

    #[serde(default)]
    pub log_level: String,

    #[serde(default)]
    pub keyword: Option<String>,

    #[serde(default)]
    pub host_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailEvent {
    #[serde(default)]
    pub original: Option<String>,
}

impl From<DetailHit> for RawLogEntry {
    fn from(hit: DetailHit) -> Self {
        let DetailHit { id, source } = hit;
        let message = source
            .message
            .or_else(|| source.event.and_then(|e| e.original));
        let message_timestamp = source
            .message_timestamp
            .or(source.ingest_timestamp)
            .unwrap_or_default();

        RawLogEntry {
            id,
            message_timestamp,
            log_level: source.log_level,
            keyword: source.keyword,
            message,
            host_name: source.host_name,
            extra: HashMap::new(),
        }
    }
}

// ── Troubleshooting reports ─────────────────────────────────────────

/// Request body for creating a troubleshooting report.
#[derive(Debug, Clone, Serialize)]
pub struct TroubleCreate {
    pub is_shared: bool,
    pub project_id: String,
    pub related_logs: Vec<String>,
    pub user_query: String,
}

/// A troubleshooting report as returned by the backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TroubleReport {
    pub id: String,

    #[serde(default)]
    pub report_name: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub user_query: String,

    #[serde(default)]
    pub is_shared: bool,

    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub created_by: String,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// A report bundled with the ids of its related log entries.
#[derive(Debug, Clone, Deserialize)]
pub struct TroubleWithLogs {
    pub trouble: TroubleReport,

    #[serde(default)]
    pub logs: Vec<String>,
}

/// Partial update for a report. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TroubleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shared: Option<bool>,
}

/// A report row in the paginated listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TroubleSummary {
    pub id: String,

    #[serde(default)]
    pub report_name: String,

    #[serde(default)]
    pub user_query: String,

    #[serde(default)]
    pub is_shared: bool,

    #[serde(default)]
    pub created_by: String,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// One page of the report listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TroubleListPage {
    #[serde(default)]
    pub items: Vec<TroubleSummary>,

    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub size: u32,

    #[serde(default)]
    pub pages: u32,
}

/// The backend's error envelope: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub detail: Option<String>,
}
