//! Parser for text exported by an AI chat assistant.
//!
//! ```text
//! WORKOUT DATA - 2024-07-04
//!
//! Bench Press:
//!   Set 1: 185 lbs × 5 reps
//!   Set 2: 185 lbs × 5 reps
//! Squat: 225 lbs x 3 reps
//! ```
//!
//! A `WORKOUT DATA - <date>` header switches the target date; without one,
//! lines go to the active date. A header naming an impossible calendar date
//! is ignored and the previous date stays in effect. Set lines nested under an exercise heading
//! are flattened to `Set <n> - <exercise>: ...`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::ParseContext;
use crate::model::{is_iso_date, ParsedImport};

static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^WORKOUT DATA\s*-\s*(\d{4}-\d{2}-\d{2})\b").unwrap()
});

/// `[Set <n> - ]<exercise>: <weight> (lbs|kg) ×|x <reps> reps`
///
/// Exercise names never contain quotes or brackets, so JSON text does not
/// qualify.
static RE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:Set \d+ - )?[^:"{}\[\]]+?:\s*\d+(?:\.\d+)?\s*(?:lbs|kg)\s*[×x]\s*\d+\s*reps\b"#)
        .unwrap()
});

/// `Set <n>: <weight> (lbs|kg) ×|x <reps> reps`, nested under a heading.
static RE_NESTED_SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Set (\d+):\s*(\d+(?:\.\d+)?\s*(?:lbs|kg)\s*[×x]\s*\d+\s*reps)\b").unwrap()
});

/// `<exercise>:` with nothing after the colon.
static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^([^:"{}\[\]]+):$"#).unwrap());

/// List markers that chat output puts in front of lines.
static RE_BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:[-*•]|\d+\.)\s+").unwrap());

/// Parse AI-export text into `{date: [line, ...]}`.
///
/// Returns `None` if no line qualifies.
#[must_use]
pub fn parse(input: &str, ctx: &ParseContext) -> Option<ParsedImport> {
    let mut parsed = ParsedImport::new();
    let mut date = ctx.active_date.clone();
    let mut heading: Option<String> = None;

    for raw in input.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(caps) = RE_HEADER.captures(trimmed) {
            if is_iso_date(&caps[1]) {
                date = caps[1].to_string();
            } else {
                debug!(header = trimmed, "Ignoring header with invalid date");
            }
            heading = None;
            continue;
        }

        let line = RE_BULLET.replace(trimmed, "");

        if let (Some(exercise), Some(caps)) = (heading.as_deref(), RE_NESTED_SET.captures(&line)) {
            let entry = format!("Set {} - {exercise}: {}", &caps[1], &caps[2]);
            parsed.entry(date.clone()).or_default().push(entry);
            continue;
        }

        if let Some(m) = RE_ENTRY.find(&line) {
            parsed
                .entry(date.clone())
                .or_default()
                .push(m.as_str().trim().to_string());
            continue;
        }

        if let Some(caps) = RE_HEADING.captures(&line) {
            heading = Some(caps[1].trim().to_string());
        }
    }

    (!parsed.is_empty()).then_some(parsed)
}
