//! Data models for wt.
//!
//! This module contains the domain models:
//! - Entry lines (strength and cardio sets)
//! - History mappings (date → lines) and the transient parsed import
//! - Templates

pub mod entry;
pub mod history;

pub use entry::{EntryLine, WeightUnit};
pub use history::{
    format_date, is_iso_date, parse_date, total_lines, HistoryEntries, ParsedImport, Templates,
};
