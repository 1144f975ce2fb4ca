//! Command implementations.

pub mod add;
pub mod completions;
pub mod entries;
pub mod export;
pub mod import;
pub mod init;
pub mod show;
pub mod sync;
pub mod template;
pub mod version;

use std::path::PathBuf;

use crate::config::require_db_path;
use crate::error::Result;
use crate::storage::SqliteStorage;

/// Open the database, failing with `NotInitialized` if it was never created.
pub(crate) fn open_storage(db_path: Option<&PathBuf>) -> Result<SqliteStorage> {
    let path = require_db_path(db_path.map(PathBuf::as_path))?;
    SqliteStorage::open(&path)
}
