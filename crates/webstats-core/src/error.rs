//! Shared error type across webstats crates.

use thiserror::Error;

/// Stable error codes (logged and written into 5xx bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Startup configuration is incomplete or invalid.
    Configuration,
    /// Page template missing, unreadable or malformed.
    TemplateUnavailable,
    /// A template placeholder had no value.
    MissingField,
    /// Stats collaborator failed or returned invalid data.
    SnapshotUnavailable,
    /// Listener could not be bound.
    Bind,
    /// Server lifecycle already started.
    AlreadyStarted,
    /// Page render exceeded its time budget.
    Timeout,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Configuration => "CONFIGURATION",
            ErrorCode::TemplateUnavailable => "TEMPLATE_UNAVAILABLE",
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::SnapshotUnavailable => "SNAPSHOT_UNAVAILABLE",
            ErrorCode::Bind => "BIND",
            ErrorCode::AlreadyStarted => "ALREADY_STARTED",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WebStatsError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum WebStatsError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("template unavailable: {0}")]
    TemplateUnavailable(String),
    #[error("missing template field: {0}")]
    MissingField(String),
    #[error("snapshot unavailable: {0}")]
    SnapshotUnavailable(String),
    #[error("bind failed: {0}")]
    Bind(String),
    #[error("server already started")]
    AlreadyStarted,
    #[error("page render timed out")]
    Timeout,
    #[error("internal: {0}")]
    Internal(String),
}

impl WebStatsError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            WebStatsError::Configuration(_) => ErrorCode::Configuration,
            WebStatsError::TemplateUnavailable(_) => ErrorCode::TemplateUnavailable,
            WebStatsError::MissingField(_) => ErrorCode::MissingField,
            WebStatsError::SnapshotUnavailable(_) => ErrorCode::SnapshotUnavailable,
            WebStatsError::Bind(_) => ErrorCode::Bind,
            WebStatsError::AlreadyStarted => ErrorCode::AlreadyStarted,
            WebStatsError::Timeout => ErrorCode::Timeout,
            WebStatsError::Internal(_) => ErrorCode::Internal,
        }
    }
}
