//! History mapping types and date helpers.

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Persisted history: ISO date → ordered, distinct entry lines.
///
/// Key order is insertion order, which is also the JSON order on disk.
pub type HistoryEntries = IndexMap<String, Vec<String>>;

/// Output of one format parser, consumed once by the merge engine.
pub type ParsedImport = IndexMap<String, Vec<String>>;

/// Workout templates: name → opaque JSON value.
pub type Templates = serde_json::Map<String, serde_json::Value>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `Error::InvalidDate` if the string is not a valid calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.len() != 10 {
        return Err(Error::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| Error::InvalidDate(input.to_string()))
}

/// Format a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whether `input` is exactly a valid `YYYY-MM-DD` date.
#[must_use]
pub fn is_iso_date(input: &str) -> bool {
    input.len() == 10 && NaiveDate::parse_from_str(input, DATE_FORMAT).is_ok()
}

/// Total number of lines across all dates.
#[must_use]
pub fn total_lines(entries: &IndexMap<String, Vec<String>>) -> usize {
    entries.values().map(Vec::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_round_trip() {
        let date = parse_date("2024-07-04").unwrap();
        assert_eq!(format_date(date), "2024-07-04");
    }

    #[test]
    fn test_parse_rejects_loose_formats() {
        assert!(matches!(parse_date("2024-7-4"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("yesterday"), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn test_is_iso_date() {
        assert!(is_iso_date("2024-01-01"));
        assert!(!is_iso_date(" 2024-01-01"));
        assert!(!is_iso_date("name"));
    }
}
