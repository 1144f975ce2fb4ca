//! SQLite storage layer for wt.
//!
//! Everything wt persists is a JSON string under one of a handful of
//! logical keys (see [`keys`]). The [`KvStore`] trait is the seam the
//! history store and sync reconciler are written against; [`SqliteStorage`]
//! is the production implementation.
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - SQLite key-value implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStorage;

use crate::error::Result;

/// Logical keys persisted by wt.
pub mod keys {
    /// History mapping: `{date: [line, ...]}`.
    pub const HISTORY: &str = "wt_history";
    /// Template mapping: `{name: value}`.
    pub const TEMPLATES: &str = "wt_templates";
    /// Epoch-millisecond `updatedAt` of the last committed mutation.
    pub const UPDATED_AT: &str = "wt_updated_at";
    /// Bearer token for the sync server.
    pub const AUTH_TOKEN: &str = "wt_auth_token";
    /// Content hash of the envelope at the last successful push/pull.
    pub const SYNCED_HASH: &str = "wt_synced_hash";
}

/// Persisted key-value store.
///
/// Values are always JSON-serialized text. A missing key is `None`;
/// callers treat unparsable values as absent.
pub trait KvStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn clear(&mut self, key: &str) -> Result<()>;

    /// Write several keys as one unit: either all land or none do.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; prior values are kept.
    fn set_many(&mut self, pairs: &[(&str, &str)]) -> Result<()>;
}
