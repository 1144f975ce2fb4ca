//! Content hashing for sync change detection.
//!
//! The hash covers history and templates but not `updatedAt`, so adopting a
//! remote timestamp does not by itself look like a local change.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::model::{HistoryEntries, Templates};
use crate::sync::types::SyncEnvelope;

#[derive(Serialize)]
struct HashedContent<'a> {
    wt_history: &'a HistoryEntries,
    templates: &'a Templates,
}

/// SHA-256 of the envelope's content, as lowercase hex.
#[must_use]
pub fn content_hash(envelope: &SyncEnvelope) -> String {
    let content = HashedContent {
        wt_history: &envelope.history,
        templates: &envelope.templates,
    };
    // String keys and plain values only, so this cannot fail.
    let json = serde_json::to_string(&content).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check if content has changed since the last recorded sync.
///
/// Returns `true` if there is no stored hash or it differs from `current_hash`.
#[must_use]
pub fn has_changed(current_hash: &str, stored_hash: Option<&str>) -> bool {
    stored_hash.is_none_or(|h| h != current_hash)
}
