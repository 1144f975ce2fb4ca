//! JSON import with recovery from chat/markdown noise.
//!
//! Pasted JSON frequently arrives wrapped in code fences, with a BOM, with
//! curly quotes from a rich-text editor, or with trailing commas. Recovery
//! removes that structural noise and retries; it never rewrites values.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::ParseContext;
use crate::model::{is_iso_date, ParsedImport};

/// Code fence markers, with an optional language tag.
static RE_CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").unwrap());

/// A comma followed only by whitespace before a closing brace/bracket.
static RE_TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",(\s*[}\]])").unwrap());

/// Key under which exported envelopes carry their history.
const ENVELOPE_HISTORY_KEY: &str = "wt_history";

/// Parse `input` as a history mapping `{date: [line, ...]}`.
///
/// Accepts either a bare mapping or an exported envelope whose
/// `wt_history` member is the mapping. Every key must be a `YYYY-MM-DD`
/// date and every value an array of strings; anything else is a non-match.
#[must_use]
pub fn parse(input: &str, _ctx: &ParseContext) -> Option<ParsedImport> {
    let object = parse_object(input)?;
    history_from_object(object)
}

/// Parse `input` as a JSON object, applying recovery on failure.
///
/// Returns `None` for arrays, scalars, and anything that still fails after
/// recovery.
#[must_use]
pub fn parse_object(input: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(map)) => return Some(map),
        Ok(_) => return None,
        Err(e) => debug!(error = %e, "Direct JSON parse failed, attempting recovery"),
    }

    let recovered = recover(input)?;
    match serde_json::from_str::<Value>(&recovered) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "JSON recovery failed");
            None
        }
    }
}

/// Strip structural noise and return the candidate JSON span.
fn recover(input: &str) -> Option<String> {
    let text = input.trim_start_matches('\u{feff}');
    let text = RE_CODE_FENCE.replace_all(text, "");
    let text = normalize_quotes(&text);
    let span = extract_span(&text)?;
    Some(RE_TRAILING_COMMA.replace_all(span, "$1").into_owned())
}

/// Replace typographic quotes with their ASCII equivalents.
fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
            other => other,
        })
        .collect()
}

/// Greedy span from the first `{` or `[` to the last matching closer.
fn extract_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let closer = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(closer)?;
    (end > start).then(|| &text[start..=end])
}

/// Validate shape and convert to a parsed import.
fn history_from_object(mut object: Map<String, Value>) -> Option<ParsedImport> {
    if let Some(Value::Object(inner)) = object.remove(ENVELOPE_HISTORY_KEY) {
        object = inner;
    }

    let mut parsed = ParsedImport::with_capacity(object.len());
    for (date, value) in object {
        if !is_iso_date(&date) {
            debug!(key = %date, "JSON key is not an ISO date");
            return None;
        }
        let Value::Array(items) = value else {
            debug!(date = %date, "JSON value is not an array");
            return None;
        };
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(line) => lines.push(line),
                _ => return None,
            }
        }
        parsed.insert(date, lines);
    }

    (!parsed.is_empty()).then_some(parsed)
}
