//! Entry line model.
//!
//! An entry line is the canonical free-text record of one logged set.
//! Lines are stored as plain strings; this module only builds them.

use serde::{Deserialize, Serialize};

/// Weight unit for strength sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    /// Get the string representation used in entry lines.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lbs => "lbs",
            Self::Kg => "kg",
        }
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single logged set, before it is flattened to a line.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryLine {
    /// `"<exercise>: <weight> <unit> × <reps> reps"`, optionally prefixed
    /// with `"Set <n> - "`.
    Strength {
        exercise: String,
        weight: f64,
        unit: WeightUnit,
        reps: u32,
        set: Option<u32>,
    },
    /// `"<exercise>: <minutes> min"` or
    /// `"<exercise>: <distance> mi in <minutes> min"`.
    Cardio {
        exercise: String,
        minutes: f64,
        distance: Option<f64>,
    },
}

impl EntryLine {
    /// Render the canonical line.
    #[must_use]
    pub fn to_line(&self) -> String {
        match self {
            Self::Strength {
                exercise,
                weight,
                unit,
                reps,
                set,
            } => {
                let body = format!(
                    "{}: {} {unit} × {reps} reps",
                    exercise.trim(),
                    format_number(*weight)
                );
                match set {
                    Some(n) => format!("Set {n} - {body}"),
                    None => body,
                }
            }
            Self::Cardio {
                exercise,
                minutes,
                distance,
            } => match distance {
                Some(d) => format!(
                    "{}: {} mi in {} min",
                    exercise.trim(),
                    format_number(*d),
                    format_number(*minutes)
                ),
                None => format!("{}: {} min", exercise.trim(), format_number(*minutes)),
            },
        }
    }
}

/// Format a number without a trailing `.0` for whole values.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
