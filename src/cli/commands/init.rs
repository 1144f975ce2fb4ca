//! Create the wt data directory and database.
//!
//! The database lives at `~/.wt/data/wt.db` (`~/.wt/test/wt.db` when
//! `WT_TEST_DB=1`), unless `--db` / `WT_DB` names another file.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    reinitialized: bool,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if the database exists and `force` is not
/// set, or an error if the directory or database cannot be created.
pub fn execute(db_path: Option<&PathBuf>, force: bool, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    let existed = db_path.exists();
    if existed && !force {
        return Err(Error::AlreadyInitialized { path: db_path });
    }

    if crate::is_dry_run() {
        println!("Would create database at {}", db_path.display());
        return Ok(());
    }

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if existed {
        remove_database(&db_path)?;
    }

    // Opening applies the schema.
    SqliteStorage::open(&db_path)?;

    if json {
        let output = InitOutput {
            database: db_path,
            reinitialized: existed,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Initialized wt database");
        println!("  Database: {}", db_path.display());
        println!();
        println!("Next: 'wt import <file>' or 'wt add <exercise> --weight W --reps R'.");
    }

    Ok(())
}

/// Delete the database file and its WAL side files.
fn remove_database(path: &Path) -> Result<()> {
    fs::remove_file(path)?;
    for suffix in ["-wal", "-shm"] {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        let side = PathBuf::from(side);
        if side.exists() {
            fs::remove_file(side)?;
        }
    }
    Ok(())
}
