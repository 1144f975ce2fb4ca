//! Import pasted or exported workout data.
//!
//! Input is read whole (from a file or stdin), the format is detected from
//! content alone, and the result is merged into history. A rejected input
//! never reaches the store.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::open_storage;
use crate::config::resolve_active_date;
use crate::error::Result;
use crate::history::{HistoryStore, MergeResult};
use crate::import::{detect_or_reject, ImportFormat, ParseContext};

#[derive(Serialize)]
struct ImportOutput<'a> {
    format: ImportFormat,
    dry_run: bool,
    #[serde(flatten)]
    result: &'a MergeResult,
}

/// Execute the import command.
///
/// # Errors
///
/// Returns `ParseRejection` if no format matched, or an I/O or database error.
pub fn execute(
    file: Option<&Path>,
    date: Option<&str>,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let active_date = resolve_active_date(date)?;
    let mut storage = open_storage(db_path)?;
    let input = read_input(file)?;

    let detection = detect_or_reject(&input, &ParseContext::new(active_date))?;

    let mut store = HistoryStore::new(&mut storage);
    let dry_run = crate::is_dry_run();
    let result = if dry_run {
        store.preview_merge(&detection.entries)?
    } else {
        store.merge_commit(&detection.entries)?
    };

    if json {
        let output = ImportOutput {
            format: detection.format,
            dry_run,
            result: &result,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        let verb = if dry_run { "Would import" } else { "Imported" };
        println!(
            "{verb} {} new entries ({} skipped) from {} input",
            result.added, result.skipped, detection.format
        );
        if !result.dates_touched.is_empty() {
            println!("  Dates: {}", result.dates_touched.join(", "));
        }
    }

    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}
