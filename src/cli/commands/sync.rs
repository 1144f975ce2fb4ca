//! Sync command implementations (login, push, pull, status).
//!
//! Network calls run on a current-thread tokio runtime and are awaited to
//! completion; there is no retry. A failed request leaves local data as it
//! was.

use std::future::Future;
use std::path::PathBuf;

use serde_json::json;
use tracing::warn;

use super::open_storage;
use crate::cli::SyncCommands;
use crate::config::WtConfig;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::model::total_lines;
use crate::sync::{
    clear_token, get_sync_status, load_token, print_status, save_token, HttpRemote, Remote,
    SyncOutcome, SyncReconciler,
};

/// Execute sync commands.
pub fn execute(command: &SyncCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let config = WtConfig::load()?;
    match command {
        SyncCommands::Login { email, password } => login(&config, email, password, db_path, json),
        SyncCommands::Logout => logout(&config, db_path, json),
        SyncCommands::Push => push(&config, db_path, json),
        SyncCommands::Pull => pull(&config, db_path, json),
        SyncCommands::Status => status(&config, db_path, json),
    }
}

fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    Ok(rt.block_on(future))
}

fn remote(config: &WtConfig) -> Result<HttpRemote> {
    Ok(HttpRemote::new(
        &config.resolve_server_url(),
        config.resolve_timeout(),
    )?)
}

fn login(
    config: &WtConfig,
    email: &str,
    password: &str,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    let server_url = config.resolve_server_url();

    if crate::is_dry_run() {
        println!("Would log in to {server_url} as {email}");
        return Ok(());
    }

    let remote = remote(config)?;
    let token = block_on(remote.login(email, password))??;
    save_token(&mut storage, &token)?;

    let mut updated = config.clone();
    updated.email = Some(email.to_string());
    updated.save()?;

    if json {
        println!("{}", json!({ "logged_in": true, "email": email, "server_url": server_url }));
    } else {
        println!("Logged in to {server_url} as {email}");
    }
    Ok(())
}

fn logout(config: &WtConfig, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    let Some(token) = load_token(&storage)? else {
        if json {
            println!("{}", json!({ "logged_in": false, "was_logged_in": false }));
        } else {
            println!("Not logged in.");
        }
        return Ok(());
    };

    if crate::is_dry_run() {
        println!("Would log out of {}", config.resolve_server_url());
        return Ok(());
    }

    // The local token is dropped even if the server cannot be reached.
    let remote = remote(config)?;
    if let Err(e) = block_on(remote.logout(&token))? {
        warn!(error = %e, "Remote logout failed; clearing local token anyway");
    }
    clear_token(&mut storage)?;

    if json {
        println!("{}", json!({ "logged_in": false, "was_logged_in": true }));
    } else {
        println!("Logged out.");
    }
    Ok(())
}

fn push(config: &WtConfig, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;

    if crate::is_dry_run() {
        let envelope = HistoryStore::new(&mut storage).envelope()?;
        println!(
            "Would push {} entries across {} dates (updatedAt {}) to {}",
            total_lines(&envelope.history),
            envelope.history.len(),
            envelope.updated_at,
            config.resolve_server_url()
        );
        return Ok(());
    }

    let remote = remote(config)?;
    let outcome = block_on(SyncReconciler::new(&mut storage, &remote).push())??;
    report(&outcome, json)
}

fn pull(config: &WtConfig, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;

    if crate::is_dry_run() {
        println!(
            "Would replace local data with the copy on {}",
            config.resolve_server_url()
        );
        return Ok(());
    }

    let remote = remote(config)?;
    let outcome = block_on(SyncReconciler::new(&mut storage, &remote).pull())??;
    report(&outcome, json)
}

fn report(outcome: &SyncOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
        return Ok(());
    }
    match outcome {
        SyncOutcome::Pushed { updated_at } => {
            println!("Pushed local data (updatedAt {updated_at})");
        }
        SyncOutcome::ConflictServer { updated_at } => {
            println!("Server copy is newer; local data replaced with it (updatedAt {updated_at})");
        }
        SyncOutcome::Pulled { updated_at } => {
            println!("Pulled server data (updatedAt {updated_at})");
        }
    }
    Ok(())
}

fn status(config: &WtConfig, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    let sync_status = get_sync_status(
        &mut storage,
        &config.resolve_server_url(),
        config.email.clone(),
    )?;

    if json {
        println!("{}", serde_json::to_string(&sync_status)?);
    } else {
        print_status(&sync_status);
    }
    Ok(())
}
