//! Show logged entries.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use super::open_storage;
use crate::config::resolve_active_date;
use crate::error::Result;
use crate::history::HistoryStore;
use crate::model::{total_lines, HistoryEntries};

#[derive(Serialize)]
struct ShowOutput<'a> {
    entries: &'a HistoryEntries,
    dates: usize,
    count: usize,
}

/// Execute the show command.
///
/// Without `--all`, only the active date (default today) is shown.
///
/// # Errors
///
/// Returns an error if the date is invalid or the database cannot be read.
pub fn execute(date: Option<&str>, all: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    let history = HistoryStore::new(&mut storage).read()?;

    let selected: HistoryEntries = if all {
        history
    } else {
        let date = resolve_active_date(date)?;
        let lines = history.get(&date).cloned().unwrap_or_default();
        std::iter::once((date, lines)).collect()
    };

    if crate::is_csv() {
        println!("date,index,line");
        for (date, lines) in &selected {
            for (i, line) in lines.iter().enumerate() {
                println!("{date},{},{}", i + 1, crate::csv_escape(line));
            }
        }
    } else if json {
        let output = ShowOutput {
            entries: &selected,
            dates: selected.len(),
            count: total_lines(&selected),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if total_lines(&selected) == 0 {
        match selected.keys().next() {
            Some(date) if !all => println!("No entries on {date}."),
            _ => println!("No entries."),
        }
    } else {
        print_table(&selected);
    }

    Ok(())
}

fn print_table(entries: &HistoryEntries) {
    let mut first = true;
    for (date, lines) in entries.iter().filter(|(_, lines)| !lines.is_empty()) {
        if !first {
            println!();
        }
        first = false;

        println!("{} ({} entries)", date.bold(), lines.len());
        for (i, line) in lines.iter().enumerate() {
            println!("  {:>3}. {line}", (i + 1).to_string().dimmed());
        }
    }
}
