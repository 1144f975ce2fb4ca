//! Explicit edits to logged entries: edit, remove, clear.
//!
//! Each one commits the whole mapping and stamps a new `updatedAt`.

use std::path::PathBuf;

use serde_json::json;

use super::open_storage;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::model::{format_date, parse_date};

/// Replace the line at `index` on `date`.
///
/// # Errors
///
/// Returns `EntryNotFound` for a bad index, `DuplicateEntry` if the new text
/// is already logged on that date.
pub fn edit(date: &str, index: usize, text: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let date = format_date(parse_date(date)?);
    let mut storage = open_storage(db_path)?;
    let mut store = HistoryStore::new(&mut storage);

    if crate::is_dry_run() {
        let old = line_at(&store, &date, index)?;
        println!("Would replace {date} #{index}: {old} -> {}", text.trim());
        return Ok(());
    }

    let old = store.edit_entry(&date, index, text)?;

    if json {
        let output = json!({
            "date": date,
            "index": index,
            "old": old,
            "new": text.trim(),
        });
        println!("{output}");
    } else {
        println!("Updated {date} #{index}: {}", text.trim());
    }
    Ok(())
}

/// Remove the line at `index` on `date`.
///
/// # Errors
///
/// Returns `EntryNotFound` for a bad index.
pub fn remove(date: &str, index: usize, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let date = format_date(parse_date(date)?);
    let mut storage = open_storage(db_path)?;
    let mut store = HistoryStore::new(&mut storage);

    if crate::is_dry_run() {
        let line = line_at(&store, &date, index)?;
        println!("Would remove {date} #{index}: {line}");
        return Ok(());
    }

    let removed = store.remove_entry(&date, index)?;

    if json {
        let output = json!({
            "date": date,
            "index": index,
            "removed": removed,
        });
        println!("{output}");
    } else {
        println!("Removed {date} #{index}: {removed}");
    }
    Ok(())
}

/// Remove every line on `date`.
///
/// # Errors
///
/// Returns an error if the date is invalid or the database cannot be written.
pub fn clear(date: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let date = format_date(parse_date(date)?);
    let mut storage = open_storage(db_path)?;
    let mut store = HistoryStore::new(&mut storage);

    let removed = if crate::is_dry_run() {
        store.read()?.get(&date).map_or(0, Vec::len)
    } else {
        store.clear_date(&date)?
    };

    if json {
        let output = json!({
            "date": date,
            "removed": removed,
            "dry_run": crate::is_dry_run(),
        });
        println!("{output}");
    } else if crate::is_dry_run() {
        println!("Would remove {removed} entries from {date}");
    } else if removed == 0 {
        println!("No entries on {date}.");
    } else {
        println!("Removed {removed} entries from {date}");
    }
    Ok(())
}

fn line_at<S: crate::storage::KvStore>(
    store: &HistoryStore<'_, S>,
    date: &str,
    index: usize,
) -> Result<String> {
    store
        .read()?
        .get(date)
        .and_then(|lines| index.checked_sub(1).and_then(|i| lines.get(i)).cloned())
        .ok_or_else(|| Error::EntryNotFound {
            date: date.to_string(),
            index,
        })
}
