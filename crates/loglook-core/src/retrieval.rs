// ── Incremental log retrieval ──
//
// The recent-log feed pages through an EXPANDING time window: every
// fetch asks the backend for a strictly larger window (1-based index),
// so consecutive responses overlap and are merged by record identity.
// An empty merge result, not an empty response, is what exhausts the
// feed.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use loglook_api::RawLogEntry;

use crate::convert;
use crate::error::CoreError;
use crate::filter::{LevelVisibility, SortOrder};
use crate::model::period::Period;
use crate::model::record::{LogLevel, LogRecord, RecordId};

/// Source of log pages. Implemented for `loglook_api::LogClient`;
/// tests substitute scripted sources.
pub trait LogPageSource {
    /// The expanding recent-log window for `fetch_index` (1-based).
    async fn recent_page(
        &self,
        project_id: &str,
        fetch_index: u32,
    ) -> Result<Vec<RawLogEntry>, loglook_api::Error>;

    /// All entries within a chart period.
    async fn chart_page(
        &self,
        project_id: &str,
        period: Period,
    ) -> Result<Vec<RawLogEntry>, loglook_api::Error>;
}

impl LogPageSource for loglook_api::LogClient {
    async fn recent_page(
        &self,
        project_id: &str,
        fetch_index: u32,
    ) -> Result<Vec<RawLogEntry>, loglook_api::Error> {
        self.recent_logs(project_id, fetch_index).await
    }

    async fn chart_page(
        &self,
        project_id: &str,
        period: Period,
    ) -> Result<Vec<RawLogEntry>, loglook_api::Error> {
        self.mainboard_logs(project_id, period.query_param()).await
    }
}

/// Retrieval state of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedState {
    /// Ready for the next fetch.
    #[default]
    Idle,
    /// A fetch is in flight; further fetches are rejected.
    Fetching,
    /// The window expansion stopped yielding new records. Terminal.
    Exhausted,
}

/// Outcome of one `fetch_more` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchProgress {
    /// This many new records were appended.
    Appended(usize),
    /// No new records; the feed is exhausted.
    Exhausted,
}

/// Accumulating view over a project's recent logs.
///
/// Records are kept in arrival order and deduplicated by identity;
/// `view` layers visibility and sort on top without mutating them. A
/// fresh feed starts by fetching: callers are expected to drive
/// `fetch_more` immediately after construction.
pub struct LogFeed<S> {
    source: S,
    project_id: String,
    feed_id: Uuid,
    fetch_index: u32,
    records: Vec<LogRecord>,
    seen: HashSet<RecordId>,
    state: FeedState,
    visibility: LevelVisibility,
    sort: SortOrder,
}

impl<S: LogPageSource> LogFeed<S> {
    pub fn new(source: S, project_id: impl Into<String>) -> Self {
        Self {
            source,
            project_id: project_id.into(),
            feed_id: Uuid::new_v4(),
            fetch_index: 1,
            records: Vec::new(),
            seen: HashSet::new(),
            state: FeedState::Idle,
            visibility: LevelVisibility::default(),
            sort: SortOrder::default(),
        }
    }

    // ── Retrieval ────────────────────────────────────────────────────

    /// Fetch the next (larger) window and merge it in.
    ///
    /// Rejected while a fetch is in flight; a no-op once exhausted. On
    /// failure the feed returns to `Idle` with its accumulated records
    /// intact, and the same window index is retried on the next call.
    pub async fn fetch_more(&mut self) -> Result<FetchProgress, CoreError> {
        match self.state {
            FeedState::Fetching => {
                return Err(CoreError::Validation {
                    message: "a fetch is already in flight".into(),
                });
            }
            FeedState::Exhausted => return Ok(FetchProgress::Exhausted),
            FeedState::Idle => {}
        }

        let index = self.fetch_index;
        self.state = FeedState::Fetching;
        debug!(feed = %self.feed_id, index, "fetching recent-log window");

        match self.source.recent_page(&self.project_id, index).await {
            Err(e) => {
                self.state = FeedState::Idle;
                Err(e.into())
            }
            Ok(entries) => {
                let added = self.merge(entries);
                self.fetch_index += 1;

                if added == 0 {
                    debug!(feed = %self.feed_id, index, "window yielded nothing new; feed exhausted");
                    self.state = FeedState::Exhausted;
                    Ok(FetchProgress::Exhausted)
                } else {
                    self.state = FeedState::Idle;
                    Ok(FetchProgress::Appended(added))
                }
            }
        }
    }

    /// Merge a page of wire entries, returning how many were new.
    ///
    /// Malformed entries are dropped at normalization; already-seen
    /// identities are skipped (overlap between windows is expected).
    fn merge(&mut self, entries: Vec<RawLogEntry>) -> usize {
        let mut added = 0;
        for entry in entries {
            let Some(record) = convert::normalize(entry) else {
                continue;
            };
            if self.seen.insert(record.id.clone()) {
                self.records.push(record);
                added += 1;
            }
        }
        added
    }

    /// One-shot chart window fetch, normalized for the aggregators.
    ///
    /// Independent of the feed's own pagination; the graph and the
    /// distribution views share the batch this returns.
    pub async fn chart_window(&self, period: Period) -> Result<Vec<LogRecord>, CoreError> {
        let entries = self.source.chart_page(&self.project_id, period).await?;
        Ok(convert::normalize_page(entries))
    }

    // ── Derived view ─────────────────────────────────────────────────

    /// The records as currently presented: visibility-filtered and
    /// sorted by timestamp. Purely derived; the accumulated set is
    /// never reordered or shrunk by this.
    pub fn view(&self) -> Vec<&LogRecord> {
        let mut visible: Vec<&LogRecord> = self
            .records
            .iter()
            .filter(|r| self.visibility.matches(r))
            .collect();

        match self.sort {
            SortOrder::NewestFirst => visible.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::OldestFirst => visible.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        }

        visible
    }

    /// Flip visibility of one level in the derived view.
    pub fn toggle_level(&mut self, level: LogLevel) {
        self.visibility.toggle(level);
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Every accumulated record, in arrival order.
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Instance identity; late responses addressed to a discarded feed
    /// can be recognized and ignored by comparing this.
    pub fn feed_id(&self) -> Uuid {
        self.feed_id
    }

    /// The window index the next fetch will request.
    pub fn next_fetch_index(&self) -> u32 {
        self.fetch_index
    }
}
