//! In-process remote for reconciler tests.
//!
//! Holds one envelope and applies the server's conflict rule.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use super::remote::Remote;
use super::types::{PushResponse, SyncEnvelope, SyncError, SyncResult};

#[derive(Debug, Default)]
struct MemoryState {
    envelope: SyncEnvelope,
    email: String,
    password: String,
    tokens: HashSet<String>,
    issued: u64,
    offline: bool,
}

/// In-process remote holding a single envelope.
///
/// Applies the server's rule: a push is rejected with the stored envelope
/// when the stored `updatedAt` is strictly greater than the submitted one;
/// otherwise it is stored with a fresh stamp above both.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: Mutex<MemoryState>,
}

impl MemoryRemote {
    /// A remote that accepts `email` / `password`.
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                email: email.to_string(),
                password: password.to_string(),
                ..MemoryState::default()
            }),
        }
    }

    /// Replace the stored envelope.
    pub fn set_envelope(&self, envelope: SyncEnvelope) {
        self.lock().envelope = envelope;
    }

    /// A copy of the stored envelope.
    #[must_use]
    pub fn envelope(&self) -> SyncEnvelope {
        self.lock().envelope.clone()
    }

    /// While offline, every call fails with `SyncError::Transport`.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn authorized(&self, token: &str) -> SyncResult<std::sync::MutexGuard<'_, MemoryState>> {
        let state = self.lock();
        if state.offline {
            return Err(SyncError::Transport("remote unreachable".to_string()));
        }
        if !state.tokens.contains(token) {
            return Err(SyncError::Unauthorized);
        }
        Ok(state)
    }
}

impl Remote for MemoryRemote {
    async fn login(&self, email: &str, password: &str) -> SyncResult<String> {
        let mut state = self.lock();
        if state.offline {
            return Err(SyncError::Transport("remote unreachable".to_string()));
        }
        if state.email != email || state.password != password {
            return Err(SyncError::Unauthorized);
        }
        state.issued += 1;
        let token = format!("memory-token-{}", state.issued);
        state.tokens.insert(token.clone());
        Ok(token)
    }

    async fn logout(&self, token: &str) -> SyncResult<()> {
        let mut state = self.authorized(token)?;
        state.tokens.remove(token);
        Ok(())
    }

    async fn fetch(&self, token: &str) -> SyncResult<SyncEnvelope> {
        Ok(self.authorized(token)?.envelope.clone())
    }

    async fn push(&self, token: &str, envelope: &SyncEnvelope) -> SyncResult<PushResponse> {
        let mut state = self.authorized(token)?;
        if state.envelope.updated_at > envelope.updated_at {
            return Ok(PushResponse::Conflict(state.envelope.clone()));
        }

        let now = chrono::Utc::now().timestamp_millis();
        let updated_at = now.max(envelope.updated_at.saturating_add(1));
        state.envelope = SyncEnvelope {
            updated_at,
            ..envelope.clone()
        };
        Ok(PushResponse::Accepted { updated_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_remote_conflict_rule() {
        let remote = MemoryRemote::new("a@b.c", "pw");
        let token = remote.login("a@b.c", "pw").await.unwrap();
        remote.set_envelope(SyncEnvelope {
            updated_at: 200,
            ..SyncEnvelope::default()
        });

        let stale = SyncEnvelope {
            updated_at: 100,
            ..SyncEnvelope::default()
        };
        assert!(matches!(
            remote.push(&token, &stale).await.unwrap(),
            PushResponse::Conflict(e) if e.updated_at == 200
        ));

        // Equal timestamps are accepted.
        let tied = SyncEnvelope {
            updated_at: 200,
            ..SyncEnvelope::default()
        };
        match remote.push(&token, &tied).await.unwrap() {
            PushResponse::Accepted { updated_at } => assert!(updated_at > 200),
            other => panic!("expected accept, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_memory_remote_rejects_unknown_token_and_bad_login() {
        let remote = MemoryRemote::new("a@b.c", "pw");
        assert!(matches!(remote.fetch("nope").await, Err(SyncError::Unauthorized)));
        assert!(matches!(remote.login("a@b.c", "wrong").await, Err(SyncError::Unauthorized)));

        let token = remote.login("a@b.c", "pw").await.unwrap();
        remote.logout(&token).await.unwrap();
        assert!(matches!(remote.fetch(&token).await, Err(SyncError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_push_at_max_stamp_does_not_overflow() {
        let remote = MemoryRemote::new("a@b.c", "pw");
        let token = remote.login("a@b.c", "pw").await.unwrap();
        let envelope = SyncEnvelope {
            updated_at: i64::MAX,
            ..SyncEnvelope::default()
        };
        match remote.push(&token, &envelope).await.unwrap() {
            PushResponse::Accepted { updated_at } => assert_eq!(updated_at, i64::MAX),
            other => panic!("expected accept, got {other:?}"),
        }
    }
}
