//! Workout history: the merge engine and the persisted store.
//!
//! - [`merge`] - pure dedup-and-append of a parsed import into a mapping
//! - [`store`] - `HistoryStore`, the only writer of persisted history

pub mod merge;
pub mod store;

pub use merge::{merge, MergeResult};
pub use store::HistoryStore;
