// ── Presentation filters for the log feed ──
//
// Derived views only: toggling visibility or flipping the sort order
// never touches the accumulated record set.

use crate::model::record::{LogLevel, LogRecord};

/// Per-level visibility toggles. Everything is visible by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelVisibility {
    info: bool,
    warn: bool,
    error: bool,
}

impl Default for LevelVisibility {
    fn default() -> Self {
        Self {
            info: true,
            warn: true,
            error: true,
        }
    }
}

impl LevelVisibility {
    /// Flip visibility of one level.
    pub fn toggle(&mut self, level: LogLevel) {
        match level {
            LogLevel::Info => self.info = !self.info,
            LogLevel::Warn => self.warn = !self.warn,
            LogLevel::Error => self.error = !self.error,
        }
    }

    pub fn shows(self, level: LogLevel) -> bool {
        match level {
            LogLevel::Info => self.info,
            LogLevel::Warn => self.warn,
            LogLevel::Error => self.error,
        }
    }

    pub fn matches(self, record: &LogRecord) -> bool {
        self.shows(record.level)
    }
}

/// Sort order of the feed view, by record timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest records first (the dashboard default).
    #[default]
    NewestFirst,
    OldestFirst,
}
