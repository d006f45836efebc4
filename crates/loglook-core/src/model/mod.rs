// ── Canonical domain model ──
//
// Every type in this module is the normalized representation of a
// LogLook entity. Wire entries are converted into these once, at the
// ingestion boundary, and everything downstream (aggregation, feed
// views, sessions) works only with them.

pub mod period;
pub mod record;
pub mod series;
pub mod trouble;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use loglook_core::model::*` gives you everything.

pub use period::Period;
pub use record::{LogLevel, LogRecord, RecordId};
pub use series::{LevelCount, TimeBucket};
pub use trouble::{ChatRole, ChatTurn, ReportIdentity, SessionStatus, ShareState};
