//! The persisted history store.
//!
//! `HistoryStore` borrows a [`KvStore`] and is the only code that writes
//! the history, templates and `updatedAt` keys. Every mutation goes
//! through [`HistoryStore::commit`] (or [`HistoryStore::replace_with`] for
//! sync), which serializes first and then writes all keys in one unit.

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::history::merge::{merge, MergeResult};
use crate::model::{HistoryEntries, ParsedImport, Templates};
use crate::storage::{keys, KvStore};
use crate::sync::SyncEnvelope;

/// Versioned, timestamped mapping of date → entry lines.
pub struct HistoryStore<'a, S: KvStore> {
    storage: &'a mut S,
}

impl<'a, S: KvStore> HistoryStore<'a, S> {
    /// Wrap a storage handle.
    #[must_use]
    pub fn new(storage: &'a mut S) -> Self {
        Self { storage }
    }

    /// Borrow the underlying key-value store.
    pub fn kv(&self) -> &S {
        &*self.storage
    }

    /// Mutably borrow the underlying key-value store.
    pub fn kv_mut(&mut self) -> &mut S {
        &mut *self.storage
    }

    /// Read the history mapping.
    ///
    /// Missing or malformed persisted state reads as an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend itself fails.
    pub fn read(&self) -> Result<HistoryEntries> {
        Ok(self.read_json(keys::HISTORY)?.unwrap_or_default())
    }

    /// Read the template mapping (empty if missing or malformed).
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend itself fails.
    pub fn read_templates(&self) -> Result<Templates> {
        Ok(self.read_json(keys::TEMPLATES)?.unwrap_or_default())
    }

    /// Epoch-millisecond timestamp of the last committed mutation (0 if none).
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend itself fails.
    pub fn updated_at(&self) -> Result<i64> {
        Ok(self.read_json(keys::UPDATED_AT)?.unwrap_or(0))
    }

    /// Persist the full mapping and stamp a new `updatedAt`.
    ///
    /// Returns the new timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails; in either case
    /// the previously persisted state is left intact.
    pub fn commit(&mut self, entries: &HistoryEntries) -> Result<i64> {
        let history_json = serde_json::to_string(entries)?;
        let stamp = self.next_stamp()?;
        let stamp_json = stamp.to_string();

        self.storage.set_many(&[
            (keys::HISTORY, &history_json),
            (keys::UPDATED_AT, &stamp_json),
        ])?;

        info!(dates = entries.len(), updated_at = stamp, "History committed");
        Ok(stamp)
    }

    /// Read, merge `import`, and commit, as one step.
    ///
    /// Nothing is written when the merge leaves the mapping unchanged, so a
    /// repeated import does not bump `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn merge_commit(&mut self, import: &ParsedImport) -> Result<MergeResult> {
        let mut entries = self.read()?;
        let before = entries.clone();
        let result = merge(&mut entries, import);

        if entries != before {
            self.commit(&entries)?;
        }
        Ok(result)
    }

    /// Compute what [`merge_commit`](Self::merge_commit) would do, without writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn preview_merge(&self, import: &ParsedImport) -> Result<MergeResult> {
        let mut entries = self.read()?;
        Ok(merge(&mut entries, import))
    }

    /// Append a single hand-typed line to `date`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateEntry` if the line is already logged on that
    /// date, or `Error::InvalidArgument` if it is blank.
    pub fn add_entry(&mut self, date: &str, line: &str) -> Result<i64> {
        let line = non_blank(line)?;
        let mut entries = self.read()?;
        let day = entries.entry(date.to_string()).or_default();
        if day.iter().any(|l| l == line) {
            return Err(Error::DuplicateEntry {
                date: date.to_string(),
                line: line.to_string(),
            });
        }
        day.push(line.to_string());
        self.commit(&entries)
    }

    /// Replace the line at 1-based `index` on `date`. Returns the old line.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntryNotFound` for a bad index, or
    /// `Error::DuplicateEntry` if another line on that date already equals
    /// the new text.
    pub fn edit_entry(&mut self, date: &str, index: usize, text: &str) -> Result<String> {
        let text = non_blank(text)?;
        let mut entries = self.read()?;
        let day = day_mut(&mut entries, date, index)?;
        let slot = index - 1;

        if day.iter().enumerate().any(|(i, l)| i != slot && l == text) {
            return Err(Error::DuplicateEntry {
                date: date.to_string(),
                line: text.to_string(),
            });
        }

        let old = std::mem::replace(&mut day[slot], text.to_string());
        self.commit(&entries)?;
        Ok(old)
    }

    /// Remove the line at 1-based `index` on `date`. Returns the removed line.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntryNotFound` for a bad index.
    pub fn remove_entry(&mut self, date: &str, index: usize) -> Result<String> {
        let mut entries = self.read()?;
        let day = day_mut(&mut entries, date, index)?;
        let removed = day.remove(index - 1);
        if day.is_empty() {
            entries.shift_remove(date);
        }
        self.commit(&entries)?;
        Ok(removed)
    }

    /// Remove every line on `date`. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn clear_date(&mut self, date: &str) -> Result<usize> {
        let mut entries = self.read()?;
        match entries.shift_remove(date) {
            Some(lines) => {
                self.commit(&entries)?;
                Ok(lines.len())
            }
            None => Ok(0),
        }
    }

    /// Persist the template mapping and stamp a new `updatedAt`.
    ///
    /// Templates travel in the sync envelope, so changing them counts as a
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_templates(&mut self, templates: &Templates) -> Result<i64> {
        let templates_json = serde_json::to_string(templates)?;
        let stamp = self.next_stamp()?;
        let stamp_json = stamp.to_string();

        self.storage.set_many(&[
            (keys::TEMPLATES, &templates_json),
            (keys::UPDATED_AT, &stamp_json),
        ])?;
        Ok(stamp)
    }

    /// Snapshot the local state as a sync envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn envelope(&self) -> Result<SyncEnvelope> {
        Ok(SyncEnvelope {
            history: self.read()?,
            templates: self.read_templates()?,
            updated_at: self.updated_at()?,
        })
    }

    /// Overwrite history and templates with `envelope`, adopting its
    /// `updatedAt` rather than stamping a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn replace_with(&mut self, envelope: &SyncEnvelope) -> Result<()> {
        let history_json = serde_json::to_string(&envelope.history)?;
        let templates_json = serde_json::to_string(&envelope.templates)?;
        let stamp_json = envelope.updated_at.to_string();

        self.storage.set_many(&[
            (keys::HISTORY, &history_json),
            (keys::TEMPLATES, &templates_json),
            (keys::UPDATED_AT, &stamp_json),
        ])?;

        info!(
            dates = envelope.history.len(),
            updated_at = envelope.updated_at,
            "Local store replaced from remote envelope"
        );
        Ok(())
    }

    /// Adopt `updated_at` without touching history or templates.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn adopt_updated_at(&mut self, updated_at: i64) -> Result<()> {
        self.storage.set(keys::UPDATED_AT, &updated_at.to_string())
    }

    /// Next `updatedAt`: wall clock, but never below the current one.
    /// Saturates at `i64::MAX`.
    fn next_stamp(&self) -> Result<i64> {
        let now = chrono::Utc::now().timestamp_millis();
        Ok(now.max(self.updated_at()?.saturating_add(1)))
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring malformed persisted value");
                Ok(None)
            }
        }
    }
}

fn non_blank(line: &str) -> Result<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("entry line is empty".to_string()));
    }
    Ok(trimmed)
}

fn day_mut<'e>(entries: &'e mut HistoryEntries, date: &str, index: usize) -> Result<&'e mut Vec<String>> {
    let not_found = || Error::EntryNotFound {
        date: date.to_string(),
        index,
    };
    let day = entries.get_mut(date).ok_or_else(not_found)?;
    if index == 0 || index > day.len() {
        return Err(not_found());
    }
    Ok(day)
}
