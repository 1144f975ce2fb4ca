//! CSV import: `Exercise,Set,Weight,Reps`.

use std::sync::LazyLock;

use regex::Regex;

use super::ParseContext;
use crate::model::ParsedImport;

static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*exercise\s*,\s*set\s*,\s*weight\s*,\s*reps\s*$").unwrap()
});

/// Parse CSV rows into lines under the active date.
///
/// Rows with fewer than four columns or an empty exercise are skipped.
/// Weights are taken as pounds.
#[must_use]
pub fn parse(input: &str, ctx: &ParseContext) -> Option<ParsedImport> {
    let mut lines = input
        .trim_start_matches('\u{feff}')
        .lines()
        .skip_while(|l| l.trim().is_empty());

    let header = lines.next()?;
    if !RE_HEADER.is_match(header) {
        return None;
    }

    let entries: Vec<String> = lines
        .filter_map(|row| {
            let cols: Vec<&str> = row.split(',').map(str::trim).collect();
            if cols.len() < 4 || cols[0].is_empty() {
                return None;
            }
            Some(format!("{}: {} lbs × {} reps", cols[0], cols[2], cols[3]))
        })
        .collect();

    if entries.is_empty() {
        return None;
    }

    let mut parsed = ParsedImport::new();
    parsed.insert(ctx.active_date.clone(), entries);
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ParseContext {
        ParseContext::new("2024-01-15")
    }

    #[test]
    fn test_basic_row() {
        let parsed = parse("Exercise,Set,Weight,Reps\nBench Press,1,185,5", &ctx()).unwrap();
        assert_eq!(parsed["2024-01-15"], vec!["Bench Press: 185 lbs × 5 reps"]);
    }

    #[test]
    fn test_header_is_case_and_space_insensitive() {
        let input = "exercise , SET,weight ,  Reps\r\nSquat, 1, 225, 3\r\n";
        let parsed = parse(input, &ctx()).unwrap();
        assert_eq!(parsed["2024-01-15"], vec!["Squat: 225 lbs × 3 reps"]);
    }

    #[test]
    fn test_short_rows_skipped() {
        let input = "Exercise,Set,Weight,Reps\nBench Press,1,185\n\nRow,1,100,10,extra";
        let parsed = parse(input, &ctx()).unwrap();
        assert_eq!(parsed["2024-01-15"], vec!["Row: 100 lbs × 10 reps"]);
    }

    #[test]
    fn test_rejects_wrong_header_or_no_rows() {
        assert_eq!(parse("Name,Weight\nBench,185", &ctx()), None);
        assert_eq!(parse("Exercise,Set,Weight,Reps\n", &ctx()), None);
        assert_eq!(parse("Exercise,Set,Weight,Reps\na,b", &ctx()), None);
        assert_eq!(parse("", &ctx()), None);
    }
}
