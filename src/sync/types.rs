//! Sync types: the envelope exchanged with the remote, outcomes and errors.

use serde::{Deserialize, Serialize};

use crate::model::{HistoryEntries, Templates};

/// Everything that travels during sync.
///
/// Serialized with the remote's field names:
/// `{"wt_history": {...}, "templates": {...}, "updatedAt": 1720000000000}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncEnvelope {
    /// Date → entry lines.
    #[serde(rename = "wt_history", default)]
    pub history: HistoryEntries,
    /// Opaque template mapping.
    #[serde(default)]
    pub templates: Templates,
    /// Epoch milliseconds of the last mutation on the side that produced this.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: i64,
}

/// Result of a push or pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The remote accepted our envelope and stamped it.
    Pushed { updated_at: i64 },
    /// The remote was newer; local state was replaced by the remote envelope.
    ConflictServer { updated_at: i64 },
    /// Local state was replaced by the remote envelope on request.
    Pulled { updated_at: i64 },
}

impl SyncOutcome {
    /// The `updatedAt` the local store holds after this outcome.
    #[must_use]
    pub const fn updated_at(&self) -> i64 {
        match self {
            Self::Pushed { updated_at }
            | Self::ConflictServer { updated_at }
            | Self::Pulled { updated_at } => *updated_at,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pushed { .. } => "pushed",
            Self::ConflictServer { .. } => "conflict_server",
            Self::Pulled { .. } => "pulled",
        }
    }
}

/// What the remote said to a push.
#[derive(Debug, Clone, PartialEq)]
pub enum PushResponse {
    /// 2xx with the newly stamped `updatedAt`.
    Accepted { updated_at: i64 },
    /// 409 carrying the remote's full envelope.
    Conflict(SyncEnvelope),
}

/// Local view of sync state, for `wt sync status`.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub server_url: String,
    pub logged_in: bool,
    pub email: Option<String>,
    pub updated_at: i64,
    pub dates: usize,
    pub lines: usize,
    pub templates: usize,
    /// False only when a previous sync recorded a hash equal to the current content.
    pub pending_changes: bool,
    pub last_synced_hash: Option<String>,
}

/// Errors from sync operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No auth token is stored; nothing was sent.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The remote rejected our credentials or token.
    #[error("Remote rejected credentials")]
    Unauthorized,

    /// The request never produced a response (connect, timeout, TLS...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A status other than 2xx, 401 or 409.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Reading or writing the local store failed. Converting into
    /// [`crate::Error`] unwraps the local error again.
    #[error("Storage error: {0}")]
    Storage(#[source] Box<crate::error::Error>),
}

impl From<crate::error::Error> for SyncError {
    fn from(err: crate::error::Error) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
