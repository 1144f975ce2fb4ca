//! wt - workout log import, merge and sync
//!
//! This crate provides the core functionality for the `wt` CLI tool.
//!
//! # Architecture
//!
//! - [`import`] - Content-based format detection and parsers (JSON, AI text, CSV)
//! - [`history`] - Dedup merge engine and the persisted history store
//! - [`sync`] - Last-writer-wins sync with the remote server
//! - [`model`] - Entry lines, history mappings, templates
//! - [`storage`] - SQLite key-value layer
//! - [`config`] - Paths, config file, active date
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod import;
pub mod model;
pub mod storage;
pub mod sync;

pub use error::{Error, Result};

/// Global dry-run flag for `--dry-run`.
///
/// When set, mutate commands preview what would happen without writing.
pub static DRY_RUN: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global CSV output flag (set when `--format csv`).
pub static CSV_OUTPUT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if dry-run mode is active.
#[inline]
pub fn is_dry_run() -> bool {
    DRY_RUN.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if CSV output is requested.
#[inline]
pub fn is_csv() -> bool {
    CSV_OUTPUT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Escape a value for CSV output (wrap in quotes if it contains commas, quotes, or newlines).
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("Squat: 225 lbs × 3 reps"), "Squat: 225 lbs × 3 reps");
        assert_eq!(csv_escape("a, b"), "\"a, b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
