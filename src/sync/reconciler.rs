//! Whole-envelope last-writer-wins reconciliation.
//!
//! The side with the higher `updatedAt` wins outright. A push either lands
//! (the remote stamps it and we adopt that stamp) or comes back as a
//! conflict carrying the remote envelope, which then replaces local state.
//! A failed request leaves local state untouched.

use tracing::info;

use super::credentials;
use super::hash::content_hash;
use super::remote::Remote;
use super::types::{PushResponse, SyncEnvelope, SyncError, SyncOutcome, SyncResult};
use crate::history::HistoryStore;
use crate::storage::KvStore;

/// Pushes and pulls between a local store and a remote.
pub struct SyncReconciler<'a, S: KvStore, R: Remote> {
    store: HistoryStore<'a, S>,
    remote: &'a R,
}

impl<'a, S: KvStore, R: Remote> SyncReconciler<'a, S, R> {
    #[must_use]
    pub fn new(storage: &'a mut S, remote: &'a R) -> Self {
        Self {
            store: HistoryStore::new(storage),
            remote,
        }
    }

    /// Offer local state to the remote.
    ///
    /// # Errors
    ///
    /// `SyncError::NotLoggedIn` without any network call if no token is
    /// stored; transport and status errors otherwise, with local state
    /// unchanged.
    pub async fn push(&mut self) -> SyncResult<SyncOutcome> {
        let token = self.token()?;
        let envelope = self.store.envelope()?;

        match self.remote.push(&token, &envelope).await? {
            PushResponse::Accepted { updated_at } => {
                self.store.adopt_updated_at(updated_at)?;
                self.mark_synced(&envelope)?;
                info!(updated_at, "Push accepted");
                Ok(SyncOutcome::Pushed { updated_at })
            }
            PushResponse::Conflict(remote) => {
                self.adopt(&remote)?;
                info!(
                    local = envelope.updated_at,
                    remote = remote.updated_at,
                    "Push rejected; adopted remote envelope"
                );
                Ok(SyncOutcome::ConflictServer {
                    updated_at: remote.updated_at,
                })
            }
        }
    }

    /// Replace local state with the remote envelope, unconditionally.
    ///
    /// # Errors
    ///
    /// Same preconditions and failure behavior as [`push`](Self::push).
    pub async fn pull(&mut self) -> SyncResult<SyncOutcome> {
        let token = self.token()?;
        let remote = self.remote.fetch(&token).await?;

        self.adopt(&remote)?;
        info!(updated_at = remote.updated_at, "Pulled remote envelope");
        Ok(SyncOutcome::Pulled {
            updated_at: remote.updated_at,
        })
    }

    fn token(&self) -> SyncResult<String> {
        credentials::load_token(self.store.kv())?.ok_or(SyncError::NotLoggedIn)
    }

    fn adopt(&mut self, remote: &SyncEnvelope) -> SyncResult<()> {
        self.store.replace_with(remote)?;
        self.mark_synced(remote)
    }

    fn mark_synced(&mut self, envelope: &SyncEnvelope) -> SyncResult<()> {
        credentials::save_synced_hash(self.store.kv_mut(), &content_hash(envelope))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryEntries, Templates};
    use crate::storage::{keys, SqliteStorage};
    use crate::sync::memory::MemoryRemote;

    fn history(date: &str, line: &str) -> HistoryEntries {
        let mut h = HistoryEntries::new();
        h.insert(date.to_string(), vec![line.to_string()]);
        h
    }

    fn envelope(date: &str, line: &str, updated_at: i64) -> SyncEnvelope {
        SyncEnvelope {
            history: history(date, line),
            templates: Templates::new(),
            updated_at,
        }
    }

    async fn logged_in(storage: &mut SqliteStorage, remote: &MemoryRemote) {
        let token = remote.login("me@example.com", "pw").await.unwrap();
        credentials::save_token(storage, &token).unwrap();
    }

    fn seed_local(storage: &mut SqliteStorage, envelope: &SyncEnvelope) {
        HistoryStore::new(storage).replace_with(envelope).unwrap();
    }

    #[tokio::test]
    async fn test_push_older_local_adopts_server_envelope() {
        let remote = MemoryRemote::new("me@example.com", "pw");
        let server = envelope("2024-07-01", "Row: 100 lbs × 10 reps", 200);
        remote.set_envelope(server.clone());

        let mut storage = SqliteStorage::open_memory().unwrap();
        logged_in(&mut storage, &remote).await;
        seed_local(&mut storage, &envelope("2024-07-04", "Squat: 225 lbs × 3 reps", 100));

        let outcome = SyncReconciler::new(&mut storage, &remote).push().await.unwrap();
        assert_eq!(outcome, SyncOutcome::ConflictServer { updated_at: 200 });

        let local = HistoryStore::new(&mut storage).envelope().unwrap();
        assert_eq!(local, server);
    }

    #[tokio::test]
    async fn test_push_newer_local_is_accepted() {
        let remote = MemoryRemote::new("me@example.com", "pw");
        remote.set_envelope(envelope("2024-07-01", "old", 200));

        let mut storage = SqliteStorage::open_memory().unwrap();
        logged_in(&mut storage, &remote).await;
        let local = envelope("2024-07-04", "Squat: 225 lbs × 3 reps", 300);
        seed_local(&mut storage, &local);

        let outcome = SyncReconciler::new(&mut storage, &remote).push().await.unwrap();
        let SyncOutcome::Pushed { updated_at } = outcome else {
            panic!("expected push, got {outcome:?}");
        };
        assert!(updated_at > 300);

        let store = HistoryStore::new(&mut storage);
        assert_eq!(store.updated_at().unwrap(), updated_at);
        assert_eq!(store.read().unwrap(), local.history);
        assert_eq!(remote.envelope().history, local.history);
    }

    #[tokio::test]
    async fn test_push_records_synced_hash() {
        let remote = MemoryRemote::new("me@example.com", "pw");
        let mut storage = SqliteStorage::open_memory().unwrap();
        logged_in(&mut storage, &remote).await;
        let local = envelope("2024-07-04", "a", 10);
        seed_local(&mut storage, &local);

        SyncReconciler::new(&mut storage, &remote).push().await.unwrap();
        assert_eq!(
            credentials::load_synced_hash(&storage).unwrap(),
            Some(content_hash(&local))
        );
    }

    #[tokio::test]
    async fn test_pull_replaces_local_unconditionally() {
        let remote = MemoryRemote::new("me@example.com", "pw");
        let server = envelope("2024-07-01", "remote line", 50);
        remote.set_envelope(server.clone());

        let mut storage = SqliteStorage::open_memory().unwrap();
        logged_in(&mut storage, &remote).await;
        seed_local(&mut storage, &envelope("2024-07-04", "newer local", 900));

        let outcome = SyncReconciler::new(&mut storage, &remote).pull().await.unwrap();
        assert_eq!(outcome, SyncOutcome::Pulled { updated_at: 50 });
        assert_eq!(HistoryStore::new(&mut storage).envelope().unwrap(), server);
    }

    #[tokio::test]
    async fn test_no_token_fails_before_any_request() {
        let remote = MemoryRemote::new("me@example.com", "pw");
        // Offline would turn any request into a transport error.
        remote.set_offline(true);
        let mut storage = SqliteStorage::open_memory().unwrap();

        let mut reconciler = SyncReconciler::new(&mut storage, &remote);
        assert!(matches!(reconciler.push().await, Err(SyncError::NotLoggedIn)));
        assert!(matches!(reconciler.pull().await, Err(SyncError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_store_untouched() {
        let remote = MemoryRemote::new("me@example.com", "pw");
        remote.set_envelope(envelope("2024-07-01", "remote", 5000));

        let mut storage = SqliteStorage::open_memory().unwrap();
        logged_in(&mut storage, &remote).await;
        let local = envelope("2024-07-04", "local", 100);
        seed_local(&mut storage, &local);
        remote.set_offline(true);

        let mut reconciler = SyncReconciler::new(&mut storage, &remote);
        assert!(matches!(reconciler.push().await, Err(SyncError::Transport(_))));
        assert!(matches!(reconciler.pull().await, Err(SyncError::Transport(_))));

        assert_eq!(HistoryStore::new(&mut storage).envelope().unwrap(), local);
        assert_eq!(storage.get(keys::SYNCED_HASH).unwrap(), None);
    }
}
