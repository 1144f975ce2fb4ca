//! Content-based import of pasted or uploaded workout text.
//!
//! Each format parser is a pure function from text to a parsed import.
//! The detector walks them in a fixed priority order and stops at the
//! first non-empty result:
//!
//! 1. **JSON** (with recovery from fences, BOMs, smart quotes, trailing commas)
//! 2. **AI export text** (`WORKOUT DATA - <date>` blocks)
//! 3. **CSV** (`Exercise,Set,Weight,Reps`)
//!
//! Detection never touches the history store.
//!
//! # Example
//!
//! ```ignore
//! use wt::import::{detect_or_reject, ParseContext};
//!
//! let ctx = ParseContext::new("2024-07-04");
//! let detection = detect_or_reject(&pasted, &ctx)?;
//! let result = store.merge_commit(&detection.entries)?;
//! ```

pub mod ai_text;
pub mod csv;
pub mod json;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::ParsedImport;

/// Maximum length of the input echo carried by a rejection.
pub const PREVIEW_MAX_CHARS: usize = 120;

/// Formats the detector can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportFormat {
    Json,
    AiText,
    Csv,
}

impl ImportFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::AiText => "ai_text",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs a parser may need besides the text itself.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Date (`YYYY-MM-DD`) used when the text does not name one.
    pub active_date: String,
}

impl ParseContext {
    #[must_use]
    pub fn new(active_date: impl Into<String>) -> Self {
        Self {
            active_date: active_date.into(),
        }
    }
}

type ParseFn = fn(&str, &ParseContext) -> Option<ParsedImport>;

/// Parsers in priority order.
const PARSERS: &[(ImportFormat, ParseFn)] = &[
    (ImportFormat::Json, json::parse),
    (ImportFormat::AiText, ai_text::parse),
    (ImportFormat::Csv, csv::parse),
];

/// A successful detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub format: ImportFormat,
    pub entries: ParsedImport,
}

/// Try each parser in priority order; return the first non-empty result.
#[must_use]
pub fn detect(input: &str, ctx: &ParseContext) -> Option<Detection> {
    PARSERS.iter().find_map(|(format, parse)| {
        let entries = parse(input, ctx).filter(|e| !e.is_empty())?;
        debug!(%format, dates = entries.len(), "Import format detected");
        Some(Detection {
            format: *format,
            entries,
        })
    })
}

/// Like [`detect`], but turns "no match" into a `ParseRejection` that
/// echoes the start of the input.
///
/// # Errors
///
/// Returns `Error::ParseRejection` if no parser matches.
pub fn detect_or_reject(input: &str, ctx: &ParseContext) -> Result<Detection> {
    detect(input, ctx).ok_or_else(|| Error::ParseRejection {
        preview: preview(input),
    })
}

/// Single-line echo of `input`, at most [`PREVIEW_MAX_CHARS`] characters.
#[must_use]
pub fn preview(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_MAX_CHARS {
        return collapsed;
    }
    let mut out: String = collapsed.chars().take(PREVIEW_MAX_CHARS - 3).collect();
    out.push_str("...");
    out
}
