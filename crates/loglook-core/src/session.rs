// ── Troubleshooting session state machine ──
//
// One session = one report. The user selects log records, submits a
// query, and the backend answers synchronously with a report. Two
// orthogonal dimensions are tracked: lifecycle (idle → submitting →
// completed | degraded) and visibility (private ⇄ shared). Lifecycle
// terminal states accept no further submissions; visibility stays
// mutable for as long as the report exists.

use indexmap::IndexSet;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use loglook_api::{TroubleCreate, TroubleListPage, TroubleReport, TroubleUpdate, TroubleWithLogs};

use crate::error::CoreError;
use crate::model::record::RecordId;
use crate::model::trouble::{ChatTurn, ReportIdentity, SessionStatus, ShareState};

/// Notice prefix the backend puts on reports whose analysis had not
/// finished when it answered. Its presence marks the degraded outcome.
pub const ANALYSIS_PENDING_SENTINEL: &str = "Analysis is still in progress";

/// Backend surface the session needs. Implemented for
/// `loglook_api::LogClient`; tests substitute scripted backends.
pub trait TroubleBackend {
    async fn create_report(&self, req: &TroubleCreate) -> Result<TroubleReport, loglook_api::Error>;

    async fn fetch_report(&self, report_id: &str) -> Result<TroubleWithLogs, loglook_api::Error>;

    async fn update_report(
        &self,
        report_id: &str,
        req: &TroubleUpdate,
    ) -> Result<TroubleReport, loglook_api::Error>;

    async fn delete_report(&self, report_id: &str) -> Result<(), loglook_api::Error>;

    async fn list_reports(
        &self,
        project_id: &str,
        page: u32,
        size: u32,
    ) -> Result<TroubleListPage, loglook_api::Error>;
}

impl TroubleBackend for loglook_api::LogClient {
    async fn create_report(
        &self,
        req: &TroubleCreate,
    ) -> Result<TroubleReport, loglook_api::Error> {
        self.create_trouble(req).await
    }

    async fn fetch_report(&self, report_id: &str) -> Result<TroubleWithLogs, loglook_api::Error> {
        self.get_trouble(report_id).await
    }

    async fn update_report(
        &self,
        report_id: &str,
        req: &TroubleUpdate,
    ) -> Result<TroubleReport, loglook_api::Error> {
        self.update_trouble(report_id, req).await
    }

    async fn delete_report(&self, report_id: &str) -> Result<(), loglook_api::Error> {
        self.delete_trouble(report_id).await
    }

    async fn list_reports(
        &self,
        project_id: &str,
        page: u32,
        size: u32,
    ) -> Result<TroubleListPage, loglook_api::Error> {
        self.list_troubles(project_id, page, size).await
    }
}

/// Change notifications for list views (report boards, sidebars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ReportCreated { id: String },
    ReportUpdated { id: String },
    ReportDeleted { id: String },
}

/// A troubleshooting session over one (eventual) report.
pub struct TroubleSession<B> {
    backend: B,
    project_id: String,
    selection: IndexSet<RecordId>,
    related_logs: Vec<String>,
    turns: Vec<ChatTurn>,
    status: SessionStatus,
    share: ShareState,
    report: Option<ReportIdentity>,
    delete_armed: bool,
    deleted: bool,
    events: broadcast::Sender<SessionEvent>,
}

impl<B: TroubleBackend> TroubleSession<B> {
    pub fn new(backend: B, project_id: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            backend,
            project_id: project_id.into(),
            selection: IndexSet::new(),
            related_logs: Vec::new(),
            turns: Vec::new(),
            status: SessionStatus::Idle,
            share: ShareState::Private,
            report: None,
            delete_armed: false,
            deleted: false,
            events,
        }
    }

    /// Subscribe to report change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Add a record to the submission selection.
    pub fn select(&mut self, id: RecordId) {
        self.selection.insert(id);
    }

    pub fn deselect(&mut self, id: &RecordId) {
        self.selection.shift_remove(id);
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Submit the query over the current selection.
    ///
    /// Appends the user turn and a pending assistant turn, sends one
    /// request, and resolves the pending turn in place. A "still in
    /// progress" response concludes the session as `Degraded`; a
    /// transport failure resolves the pending turn with an error notice
    /// and returns the session to `Idle` for a retry, selection intact.
    pub async fn submit(&mut self, query: &str) -> Result<SessionStatus, CoreError> {
        match self.status {
            SessionStatus::Submitting => {
                return Err(CoreError::Validation {
                    message: "a submission is already in flight".into(),
                });
            }
            SessionStatus::Completed | SessionStatus::Degraded => {
                return Err(CoreError::Validation {
                    message: "this session has already concluded".into(),
                });
            }
            SessionStatus::Idle => {}
        }

        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::Validation {
                message: "query must not be empty".into(),
            });
        }
        if self.selection.is_empty() {
            return Err(CoreError::Validation {
                message: "select at least one log record".into(),
            });
        }

        self.turns.push(ChatTurn::user(query));
        self.turns.push(ChatTurn::pending_assistant());
        self.status = SessionStatus::Submitting;

        let req = TroubleCreate {
            is_shared: self.share.is_shared(),
            project_id: self.project_id.clone(),
            related_logs: self.selection.iter().map(ToString::to_string).collect(),
            user_query: query.to_string(),
        };

        debug!(project = %self.project_id, selected = req.related_logs.len(), "submitting analysis request");

        match self.backend.create_report(&req).await {
            Err(e) => {
                warn!(error = %e, "analysis request failed");
                self.resolve_pending(format!("The analysis request failed: {e}"));
                self.status = SessionStatus::Idle;
                Err(e.into())
            }
            Ok(report) => {
                let degraded = is_pending_notice(&report);

                let answer = if degraded {
                    format!(
                        "The analysis for report {} is still in progress. \
                         It will appear in the report list once finished.",
                        report.id
                    )
                } else {
                    report.content.clone()
                };
                self.resolve_pending(answer);

                self.share = ShareState::from_flag(report.is_shared);
                self.related_logs = req.related_logs;
                self.report = Some(ReportIdentity {
                    id: report.id.clone(),
                    title: report.report_name,
                    content: report.content,
                });
                self.status = if degraded {
                    SessionStatus::Degraded
                } else {
                    SessionStatus::Completed
                };
                self.selection.clear();

                let _ = self.events.send(SessionEvent::ReportCreated { id: report.id });
                Ok(self.status)
            }
        }
    }

    /// Replace the content of the in-flight placeholder turn.
    fn resolve_pending(&mut self, content: String) {
        if let Some(turn) = self.turns.iter_mut().rev().find(|t| t.pending) {
            turn.content = content;
            turn.pending = false;
        }
    }

    // ── Hydration ────────────────────────────────────────────────────

    /// Open this session over an existing report.
    ///
    /// Only valid on a fresh session. Rebuilds the conversation from
    /// the stored query and content and restores share state and
    /// related log ids.
    pub async fn hydrate(&mut self, report_id: &str) -> Result<(), CoreError> {
        if self.report.is_some() || self.status != SessionStatus::Idle || !self.turns.is_empty() {
            return Err(CoreError::Validation {
                message: "session already has content; hydrate requires a fresh session".into(),
            });
        }

        let got = self
            .backend
            .fetch_report(report_id)
            .await
            .map_err(|e| not_found_or(e, "report", report_id))?;

        let report = got.trouble;
        let degraded = is_pending_notice(&report);

        self.turns.push(ChatTurn::user(report.user_query.clone()));
        self.turns.push(ChatTurn::assistant(report.content.clone()));
        self.share = ShareState::from_flag(report.is_shared);
        self.related_logs = got.logs;
        self.report = Some(ReportIdentity {
            id: report.id,
            title: report.report_name,
            content: report.content,
        });
        self.status = if degraded {
            SessionStatus::Degraded
        } else {
            SessionStatus::Completed
        };

        Ok(())
    }

    // ── Sharing ──────────────────────────────────────────────────────

    /// Flip the report's visibility, optimistically.
    ///
    /// The local state changes first; a failed update rolls it back.
    /// The update carries the current title and content alongside the
    /// flag, matching what the backend persists as one document.
    pub async fn set_shared(&mut self, shared: bool) -> Result<(), CoreError> {
        let Some(report) = self.report.clone() else {
            return Err(CoreError::Validation {
                message: "no report exists yet to share".into(),
            });
        };
        if self.share.is_shared() == shared {
            return Ok(());
        }

        let previous = self.share;
        self.share = ShareState::from_flag(shared);

        let req = TroubleUpdate {
            report_name: Some(report.title),
            content: Some(report.content),
            is_shared: Some(shared),
        };

        match self.backend.update_report(&report.id, &req).await {
            Ok(updated) => {
                self.share = ShareState::from_flag(updated.is_shared);
                self.report = Some(ReportIdentity {
                    id: report.id.clone(),
                    title: updated.report_name,
                    content: updated.content,
                });
                let _ = self.events.send(SessionEvent::ReportUpdated { id: report.id });
                Ok(())
            }
            Err(e) => {
                warn!(report = %report.id, error = %e, "share toggle failed; rolling back");
                self.share = previous;
                Err(conflict_or(e))
            }
        }
    }

    /// Update the report's title and/or content (the board edit flow).
    pub async fn update_details(
        &mut self,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<(), CoreError> {
        let Some(report) = self.report.clone() else {
            return Err(CoreError::Validation {
                message: "no report exists yet to edit".into(),
            });
        };
        if title.is_none() && content.is_none() {
            return Ok(());
        }

        let req = TroubleUpdate {
            report_name: title,
            content,
            is_shared: Some(self.share.is_shared()),
        };

        let updated = self
            .backend
            .update_report(&report.id, &req)
            .await
            .map_err(conflict_or)?;

        self.report = Some(ReportIdentity {
            id: report.id.clone(),
            title: updated.report_name,
            content: updated.content,
        });
        let _ = self.events.send(SessionEvent::ReportUpdated { id: report.id });
        Ok(())
    }

    // ── Deletion (two-step) ──────────────────────────────────────────

    /// Arm deletion; nothing is sent until `confirm_delete`.
    pub fn request_delete(&mut self) -> Result<(), CoreError> {
        if self.report.is_none() {
            return Err(CoreError::Validation {
                message: "no report exists yet to delete".into(),
            });
        }
        self.delete_armed = true;
        Ok(())
    }

    /// Disarm a pending deletion.
    pub fn cancel_delete(&mut self) {
        self.delete_armed = false;
    }

    /// Execute an armed deletion.
    ///
    /// On failure the confirmation stays armed so the user can retry
    /// or cancel explicitly.
    pub async fn confirm_delete(&mut self) -> Result<(), CoreError> {
        if !self.delete_armed {
            return Err(CoreError::Validation {
                message: "deletion has not been requested".into(),
            });
        }
        let Some(report) = self.report.clone() else {
            return Err(CoreError::Validation {
                message: "no report exists yet to delete".into(),
            });
        };

        self.backend
            .delete_report(&report.id)
            .await
            .map_err(|e| not_found_or(e, "report", &report.id))?;

        self.delete_armed = false;
        self.deleted = true;
        let _ = self.events.send(SessionEvent::ReportDeleted { id: report.id });
        Ok(())
    }

    // ── Listing ──────────────────────────────────────────────────────

    /// One page of the project's report board.
    pub async fn list_reports(&self, page: u32, size: u32) -> Result<TroubleListPage, CoreError> {
        Ok(self
            .backend
            .list_reports(&self.project_id, page, size)
            .await?)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn share_state(&self) -> ShareState {
        self.share
    }

    pub fn report(&self) -> Option<&ReportIdentity> {
        self.report.as_ref()
    }

    /// Ids of the log records the report was built from.
    pub fn related_logs(&self) -> &[String] {
        &self.related_logs
    }

    pub fn is_delete_armed(&self) -> bool {
        self.delete_armed
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Whether a report is the backend's "analysis still running" notice
/// rather than a finished analysis.
fn is_pending_notice(report: &TroubleReport) -> bool {
    let sentinel = ANALYSIS_PENDING_SENTINEL.to_ascii_lowercase();
    report.report_name.to_ascii_lowercase().contains(&sentinel)
        || report.content.to_ascii_lowercase().contains(&sentinel)
}

/// Map a mutation failure: stale identities become `Conflict`.
fn conflict_or(e: loglook_api::Error) -> CoreError {
    match e.status() {
        Some(404 | 409) => CoreError::Conflict {
            message: e.to_string(),
        },
        _ => e.into(),
    }
}

/// Map a lookup failure: 404 becomes `NotFound` with context.
fn not_found_or(e: loglook_api::Error, what: &str, id: &str) -> CoreError {
    if e.is_not_found() {
        CoreError::NotFound {
            what: what.to_string(),
            id: id.to_string(),
        }
    } else {
        e.into()
    }
}
