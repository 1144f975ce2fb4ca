//! Error types for the wt CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 4=validation, 6=sync, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::sync::SyncError;

/// Result type alias for wt operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    DatabaseError,

    // Not Found (exit 3)
    EntryNotFound,
    TemplateNotFound,

    // Validation (exit 4)
    ParseRejected,
    InvalidDate,
    InvalidArgument,
    DuplicateEntry,

    // Sync (exit 6)
    NotLoggedIn,
    SyncError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::EntryNotFound => "ENTRY_NOT_FOUND",
            Self::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            Self::ParseRejected => "PARSE_REJECTED",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DuplicateEntry => "DUPLICATE_ENTRY",
            Self::NotLoggedIn => "NOT_LOGGED_IN",
            Self::SyncError => "SYNC_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotInitialized | Self::AlreadyInitialized | Self::DatabaseError => 2,
            Self::EntryNotFound | Self::TemplateNotFound => 3,
            Self::ParseRejected
            | Self::InvalidDate
            | Self::InvalidArgument
            | Self::DuplicateEntry => 4,
            Self::NotLoggedIn | Self::SyncError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the caller should retry, either with corrected input or
    /// after a transient failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ParseRejected
                | Self::InvalidDate
                | Self::InvalidArgument
                | Self::SyncError
                | Self::DatabaseError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in wt operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `wt init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    /// No parser recognized the input. `preview` is a truncated echo.
    #[error("Unrecognized import format: {preview}")]
    ParseRejection { preview: String },

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("No entry #{index} on {date}")]
    EntryNotFound { date: String, index: usize },

    #[error("Entry already logged on {date}: {line}")]
    DuplicateEntry { date: String, line: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Sync error: {0}")]
    Sync(SyncError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<SyncError> for Error {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Storage(local) => *local,
            other => Self::Sync(other),
        }
    }
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::ParseRejection { .. } => ErrorCode::ParseRejected,
            Self::InvalidDate(_) => ErrorCode::InvalidDate,
            Self::EntryNotFound { .. } => ErrorCode::EntryNotFound,
            Self::DuplicateEntry { .. } => ErrorCode::DuplicateEntry,
            Self::TemplateNotFound(_) => ErrorCode::TemplateNotFound,
            Self::Sync(SyncError::NotLoggedIn) => ErrorCode::NotLoggedIn,
            Self::Sync(_) => ErrorCode::SyncError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => Some("Run `wt init` to create the database".to_string()),

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),

            Self::ParseRejection { .. } => Some(
                "Accepted formats:\n  \
                 JSON:    {\"2024-07-04\": [\"Bench Press: 185 lbs × 5 reps\"]}\n  \
                 AI text: WORKOUT DATA - 2024-07-04 followed by '<exercise>: <weight> lbs × <reps> reps' lines\n  \
                 CSV:     Exercise,Set,Weight,Reps header row"
                    .to_string(),
            ),

            Self::InvalidDate(_) => {
                Some("Dates use ISO format, for example 2024-07-04".to_string())
            }

            Self::EntryNotFound { date, .. } => Some(format!(
                "Use `wt show --date {date}` to list entries with their numbers."
            )),

            Self::DuplicateEntry { .. } => Some(
                "Lines are deduplicated per date. Add a `--set` number to log a repeated set."
                    .to_string(),
            ),

            Self::TemplateNotFound(_) => {
                Some("Use `wt template list` to see saved templates.".to_string())
            }

            Self::Sync(SyncError::NotLoggedIn) => {
                Some("Run `wt sync login --email <email>` first.".to_string())
            }
            Self::Sync(SyncError::Unauthorized) => Some(
                "The server rejected the stored token. Log in again with `wt sync login`."
                    .to_string(),
            ),
            Self::Sync(SyncError::Transport(_)) => Some(
                "Check the server URL (`WT_SERVER_URL` or ~/.wt/config.json). \
                 Local data was not modified."
                    .to_string(),
            ),

            Self::Sync(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
