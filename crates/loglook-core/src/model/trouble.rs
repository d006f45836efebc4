// ── Troubleshooting session types ──

use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the troubleshooting conversation.
///
/// While a submission is in flight the assistant turn exists as a
/// pending placeholder; the response replaces its content in place, so
/// turn ordering never changes after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub pending: bool,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            pending: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            pending: false,
        }
    }

    /// Placeholder assistant turn shown while the analysis runs.
    pub fn pending_assistant() -> Self {
        Self {
            role: ChatRole::Assistant,
            content: String::new(),
            pending: true,
        }
    }
}

/// Lifecycle of a troubleshooting session.
///
/// `Completed` and `Degraded` are both terminal: a degraded outcome
/// means the backend produced the report shell but its analysis was
/// still running when it answered. That is a valid conclusion of the
/// session, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Idle,
    Submitting,
    Completed,
    Degraded,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Degraded)
    }
}

/// Visibility of a report, orthogonal to the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShareState {
    #[default]
    Private,
    Shared,
}

impl ShareState {
    pub fn from_flag(shared: bool) -> Self {
        if shared { Self::Shared } else { Self::Private }
    }

    pub fn is_shared(self) -> bool {
        matches!(self, Self::Shared)
    }
}

/// Identity and current persisted fields of the session's report.
///
/// Present only after a submission (or hydration) succeeded; share and
/// delete operations require it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportIdentity {
    pub id: String,
    pub title: String,
    pub content: String,
}
