//! Sync status display.
//!
//! Status is purely local: it never contacts the remote.

use colored::Colorize;

use crate::error::Result;
use crate::history::HistoryStore;
use crate::model::total_lines;
use crate::storage::KvStore;
use crate::sync::credentials::{load_synced_hash, load_token};
use crate::sync::hash::{content_hash, has_changed};
use crate::sync::types::SyncStatus;

/// Gather the local sync state.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn get_sync_status<S: KvStore>(
    storage: &mut S,
    server_url: &str,
    email: Option<String>,
) -> Result<SyncStatus> {
    let logged_in = load_token(storage)?.is_some();
    let last_synced_hash = load_synced_hash(storage)?;
    let envelope = HistoryStore::new(storage).envelope()?;

    let lines = total_lines(&envelope.history);
    let pending_changes = match last_synced_hash.as_deref() {
        Some(stored) => has_changed(&content_hash(&envelope), Some(stored)),
        // Never synced: only pending if there is something to send.
        None => lines > 0 || !envelope.templates.is_empty(),
    };

    Ok(SyncStatus {
        server_url: server_url.to_string(),
        logged_in,
        email,
        updated_at: envelope.updated_at,
        dates: envelope.history.len(),
        lines,
        templates: envelope.templates.len(),
        pending_changes,
        last_synced_hash,
    })
}

/// Print sync status to stdout in a human-readable format.
pub fn print_status(status: &SyncStatus) {
    println!("{}", "Sync Status".bold().underline());
    println!();

    println!("{}", "Remote:".blue().bold());
    println!("  Server:     {}", status.server_url);
    if status.logged_in {
        let who = status.email.as_deref().unwrap_or("(unknown account)");
        println!("  Account:    {} {}", who, "(logged in)".green());
    } else {
        println!("  Account:    {}", "not logged in".yellow());
    }
    println!();

    println!("{}", "Local Data:".blue().bold());
    println!("  Dates:      {}", status.dates);
    println!("  Entries:    {}", status.lines);
    println!("  Templates:  {}", status.templates);
    println!("  Updated at: {}", format_updated_at(status.updated_at));
    println!();

    if status.pending_changes {
        println!("{}", "Local changes not yet synced.".yellow());
        if status.logged_in {
            println!("{}", "Run 'wt sync push' to upload them.".dimmed());
        } else {
            println!("{}", "Run 'wt sync login' first.".dimmed());
        }
    } else {
        println!("{}", "No pending changes.".green());
    }
}

/// Render an epoch-millisecond stamp as local time, or "never".
fn format_updated_at(updated_at: i64) -> String {
    if updated_at <= 0 {
        return "never".to_string();
    }
    chrono::DateTime::from_timestamp_millis(updated_at).map_or_else(
        || updated_at.to_string(),
        |dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}
