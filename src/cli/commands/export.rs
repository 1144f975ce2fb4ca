//! Export history (or the whole sync envelope) as pretty JSON.
//!
//! The output re-imports through `wt import`: a bare history is a plain
//! date mapping, and an envelope's `wt_history` member is unwrapped.

use std::path::{Path, PathBuf};

use serde_json::json;

use super::open_storage;
use crate::error::Result;
use crate::history::HistoryStore;
use crate::model::total_lines;
use crate::sync::atomic_write;

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if the database cannot be read or the file written.
pub fn execute(
    file: Option<&Path>,
    envelope: bool,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    let snapshot = HistoryStore::new(&mut storage).envelope()?;

    let mut content = if envelope {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot.history)?
    };
    content.push('\n');

    let Some(path) = file else {
        print!("{content}");
        return Ok(());
    };

    let dates = snapshot.history.len();
    let lines = total_lines(&snapshot.history);

    if crate::is_dry_run() {
        println!("Would write {lines} entries across {dates} dates to {}", path.display());
        return Ok(());
    }

    atomic_write(path, &content)?;

    if json {
        let output = json!({
            "path": path.display().to_string(),
            "dates": dates,
            "entries": lines,
            "envelope": envelope,
        });
        println!("{output}");
    } else {
        println!("Exported {lines} entries across {dates} dates to {}", path.display());
    }
    Ok(())
}
