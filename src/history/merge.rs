//! Dedup-and-append merge of parsed imports into a history mapping.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{HistoryEntries, ParsedImport};

/// Outcome of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeResult {
    /// Dates that received at least one new line, in first-touch order.
    pub dates_touched: Vec<String>,
    /// Lines appended.
    pub added: usize,
    /// Lines ignored because they were blank or already present.
    pub skipped: usize,
}

impl MergeResult {
    /// Total lines examined.
    #[must_use]
    pub fn total(&self) -> usize {
        self.added + self.skipped
    }

    /// Returns true if nothing was added.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added == 0
    }
}

/// Merge `import` into `entries`.
///
/// Every imported date gets a sequence in `entries` (created empty if
/// absent). Each line is trimmed; non-empty lines not already present on
/// that date are appended in import order. Existing lines are never
/// removed or reordered, and lines never move between dates.
pub fn merge(entries: &mut HistoryEntries, import: &ParsedImport) -> MergeResult {
    let mut result = MergeResult::default();

    for (date, lines) in import {
        let existing = entries.entry(date.clone()).or_default();
        let mut seen: HashSet<String> = existing.iter().cloned().collect();

        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() || seen.contains(trimmed) {
                result.skipped += 1;
                continue;
            }

            seen.insert(trimmed.to_string());
            existing.push(trimmed.to_string());
            result.added += 1;

            if !result.dates_touched.iter().any(|d| d == date) {
                result.dates_touched.push(date.clone());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::total_lines;

    fn import(pairs: &[(&str, &[&str])]) -> ParsedImport {
        pairs
            .iter()
            .map(|(date, lines)| {
                (
                    (*date).to_string(),
                    lines.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_merge_into_empty() {
        let mut history = HistoryEntries::new();
        let result = merge(&mut history, &import(&[("2024-07-04", &["a", "b"])]));

        assert_eq!(result.added, 2);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.dates_touched, vec!["2024-07-04"]);
        assert_eq!(history["2024-07-04"], vec!["a", "b"]);
    }

    #[test]
    fn test_existing_lines_first_new_lines_appended() {
        let mut history = import(&[("2024-07-04", &["b", "x"])]);
        let result = merge(&mut history, &import(&[("2024-07-04", &["a", "b", "c"])]));

        assert_eq!(result.added, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(history["2024-07-04"], vec!["b", "x", "a", "c"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut history = import(&[("2024-07-01", &["keep"])]);
        let incoming = import(&[
            ("2024-07-04", &["a", "  a  ", "b", ""]),
            ("2024-07-01", &["keep", "new"]),
        ]);

        let first = merge(&mut history, &incoming);
        assert_eq!(first.added, 3);
        let snapshot = history.clone();

        let second = merge(&mut history, &incoming);
        assert_eq!(second.added, 0);
        assert_eq!(second.skipped, total_lines(&incoming));
        assert!(second.dates_touched.is_empty());
        assert_eq!(history, snapshot);
    }

    #[test]
    fn test_no_duplicates_within_a_date() {
        let mut history = import(&[("d", &["a", "b"])]);
        merge(&mut history, &import(&[("d", &["b", "c", "c", " a"])]));

        let lines = &history["d"];
        let unique: HashSet<&String> = lines.iter().collect();
        assert_eq!(unique.len(), lines.len());
        assert_eq!(lines.len(), 3); // {a, b} ∪ {a, b, c}
    }

    #[test]
    fn test_dates_touched_in_first_touch_order() {
        let mut history = import(&[("2024-01-02", &["dup"])]);
        let result = merge(
            &mut history,
            &import(&[
                ("2024-01-03", &["x"]),
                ("2024-01-02", &["dup"]),
                ("2024-01-01", &["y"]),
            ]),
        );
        assert_eq!(result.dates_touched, vec!["2024-01-03", "2024-01-01"]);
    }

    #[test]
    fn test_imported_date_is_created_even_when_all_skipped() {
        let mut history = HistoryEntries::new();
        let result = merge(&mut history, &import(&[("2024-07-04", &["   "])]));

        assert_eq!(result.skipped, 1);
        assert!(history.contains_key("2024-07-04"));
        assert!(history["2024-07-04"].is_empty());
    }

    #[test]
    fn test_same_line_on_different_dates_is_kept() {
        let mut history = import(&[("2024-07-01", &["Row: 100 lbs × 10 reps"])]);
        let result = merge(&mut history, &import(&[("2024-07-02", &["Row: 100 lbs × 10 reps"])]));
        assert_eq!(result.added, 1);
        assert_eq!(history.len(), 2);
    }
}
