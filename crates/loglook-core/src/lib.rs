// loglook-core: Domain layer between loglook-api and consumers.
//
// Normalizes wire entries into a canonical model, aggregates them for
// chart views, pages the recent-log feed through an expanding time
// window, and drives the troubleshooting session state machine.

pub mod aggregate;
pub mod convert;
pub mod error;
pub mod filter;
pub mod model;
pub mod retrieval;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use filter::{LevelVisibility, SortOrder};
pub use retrieval::{FeedState, FetchProgress, LogFeed, LogPageSource};
pub use session::{
    ANALYSIS_PENDING_SENTINEL, SessionEvent, TroubleBackend, TroubleSession,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ChatRole, ChatTurn, LevelCount, LogLevel, LogRecord, Period, RecordId, ReportIdentity,
    SessionStatus, ShareState, TimeBucket,
};
