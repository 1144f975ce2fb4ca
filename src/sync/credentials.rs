//! Auth token and last-synced hash persistence.
//!
//! Both live in the key-value store next to the history, as JSON strings.

use tracing::warn;

use crate::error::Result;
use crate::storage::{keys, KvStore};

/// Stored auth token, or `None` if absent, empty or unreadable.
///
/// # Errors
///
/// Returns an error only if the storage backend fails.
pub fn load_token<S: KvStore>(storage: &S) -> Result<Option<String>> {
    load_string(storage, keys::AUTH_TOKEN)
}

/// Persist the auth token.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_token<S: KvStore>(storage: &mut S, token: &str) -> Result<()> {
    storage.set(keys::AUTH_TOKEN, &serde_json::to_string(token)?)
}

/// Forget the auth token.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn clear_token<S: KvStore>(storage: &mut S) -> Result<()> {
    storage.clear(keys::AUTH_TOKEN)
}

/// Content hash recorded after the last successful sync.
///
/// # Errors
///
/// Returns an error only if the storage backend fails.
pub fn load_synced_hash<S: KvStore>(storage: &S) -> Result<Option<String>> {
    load_string(storage, keys::SYNCED_HASH)
}

/// Record the content hash of what local and remote now agree on.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_synced_hash<S: KvStore>(storage: &mut S, hash: &str) -> Result<()> {
    storage.set(keys::SYNCED_HASH, &serde_json::to_string(hash)?)
}

fn load_string<S: KvStore>(storage: &S, key: &str) -> Result<Option<String>> {
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<String>(&raw) {
        Ok(value) if !value.trim().is_empty() => Ok(Some(value)),
        Ok(_) => Ok(None),
        Err(e) => {
            warn!(key, error = %e, "Ignoring malformed persisted value");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    #[test]
    fn test_token_round_trip_and_clear() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert_eq!(load_token(&storage).unwrap(), None);

        save_token(&mut storage, "tok-123").unwrap();
        assert_eq!(load_token(&storage).unwrap().as_deref(), Some("tok-123"));

        clear_token(&mut storage).unwrap();
        assert_eq!(load_token(&storage).unwrap(), None);
    }

    #[test]
    fn test_empty_or_malformed_token_is_absent() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        save_token(&mut storage, "  ").unwrap();
        assert_eq!(load_token(&storage).unwrap(), None);

        storage.set(keys::AUTH_TOKEN, "{bad").unwrap();
        assert_eq!(load_token(&storage).unwrap(), None);
    }
}
