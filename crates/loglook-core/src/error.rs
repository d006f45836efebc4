// ── Core error types ──
//
// User-facing errors from loglook-core. These are NOT API-specific --
// consumers never see raw HTTP plumbing. The `From<loglook_api::Error>`
// impl translates transport-layer errors into domain-appropriate
// variants. A degraded analysis result is NOT an error; it surfaces as
// `SessionStatus::Degraded`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local precondition failures (no request was sent) ────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Transport failure: {message}")]
    Transport { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{what} not found: {id}")]
    NotFound { what: String, id: String },

    /// A mutation raced a concurrent change or targeted a stale report.
    #[error("Conflicting update: {message}")]
    Conflict { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the failed operation can be retried as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Api { status, .. } => status.is_some_and(|s| s >= 500),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<loglook_api::Error> for CoreError {
    fn from(err: loglook_api::Error) -> Self {
        match err {
            loglook_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            loglook_api::Error::Transport(ref e) => {
                if e.is_timeout() || e.is_connect() {
                    CoreError::Transport {
                        message: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            loglook_api::Error::InvalidUrl(e) => CoreError::Validation {
                message: format!("invalid URL: {e}"),
            },
            loglook_api::Error::Timeout { timeout_secs } => CoreError::Transport {
                message: format!("request timed out after {timeout_secs}s"),
            },
            loglook_api::Error::Api { message, status } => CoreError::Api {
                message,
                status: Some(status),
            },
            loglook_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}
