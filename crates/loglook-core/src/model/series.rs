// ── Aggregated chart shapes ──

use serde::{Deserialize, Serialize};

use crate::model::record::LogLevel;

/// One slice of the level-distribution view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: LogLevel,
    pub count: usize,
}

/// One time bucket of the stacked time-series view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub label: String,
    pub info: usize,
    pub warn: usize,
    pub error: usize,
}

impl TimeBucket {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            info: 0,
            warn: 0,
            error: 0,
        }
    }

    /// Bump the counter for one level.
    pub fn add(&mut self, level: LogLevel) {
        match level {
            LogLevel::Info => self.info += 1,
            LogLevel::Warn => self.warn += 1,
            LogLevel::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.info + self.warn + self.error
    }
}
