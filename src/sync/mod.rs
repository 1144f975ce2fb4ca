//! Remote sync of the history envelope.
//!
//! - **Remote**: the JSON API seam (`HttpRemote`)
//! - **Reconciler**: whole-envelope last-writer-wins push and pull
//! - **Credentials**: auth token and last-synced hash in the local store
//! - **Hashing**: SHA256 content hashing for change detection
//! - **Status**: local view of what a push would send
//!
//! # Conflict rule
//!
//! The remote rejects a push (HTTP 409, with its own envelope) only when its
//! stored `updatedAt` is strictly greater than ours. On conflict the local
//! store is replaced by the remote envelope. Nothing is merged line by line.
//!
//! # Example
//!
//! ```ignore
//! use wt::sync::{HttpRemote, SyncReconciler};
//!
//! let remote = HttpRemote::new(&server_url, timeout)?;
//! let outcome = runtime.block_on(SyncReconciler::new(&mut storage, &remote).push())?;
//! ```

mod credentials;
mod file;
mod hash;
#[cfg(test)]
mod memory;
mod reconciler;
mod remote;
mod status;
mod types;

pub use credentials::{clear_token, load_synced_hash, load_token, save_synced_hash, save_token};
pub use file::atomic_write;
pub use hash::{content_hash, has_changed};
pub use reconciler::SyncReconciler;
pub use remote::{HttpRemote, Remote};
pub use status::{get_sync_status, print_status};
pub use types::{PushResponse, SyncEnvelope, SyncError, SyncOutcome, SyncResult, SyncStatus};
