//! Log a single hand-typed set.

use std::path::PathBuf;

use serde::Serialize;

use super::open_storage;
use crate::cli::AddArgs;
use crate::config::resolve_active_date;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::model::EntryLine;

#[derive(Serialize)]
struct AddOutput<'a> {
    date: &'a str,
    line: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<i64>,
    dry_run: bool,
}

/// Execute the add command.
///
/// # Errors
///
/// Returns `InvalidArgument` for an incomplete or non-finite set,
/// `DuplicateEntry` if the line is already logged on that date.
pub fn execute(args: &AddArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let date = resolve_active_date(args.date.as_deref())?;
    let line = build_line(args)?.to_line();

    let mut storage = open_storage(db_path)?;
    let mut store = HistoryStore::new(&mut storage);

    let updated_at = if crate::is_dry_run() {
        if store.read()?.get(&date).is_some_and(|day| day.contains(&line)) {
            return Err(Error::DuplicateEntry { date, line });
        }
        None
    } else {
        Some(store.add_entry(&date, &line)?)
    };

    if json {
        let output = AddOutput {
            date: &date,
            line: &line,
            updated_at,
            dry_run: updated_at.is_none(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if updated_at.is_none() {
        println!("Would add to {date}: {line}");
    } else {
        println!("Added to {date}: {line}");
    }

    Ok(())
}

fn build_line(args: &AddArgs) -> Result<EntryLine> {
    let exercise = args.exercise.trim();
    if exercise.is_empty() || exercise.contains(':') {
        return Err(Error::InvalidArgument(
            "exercise name must be non-empty and must not contain ':'".to_string(),
        ));
    }

    match (args.weight, args.reps, args.minutes) {
        (Some(weight), Some(reps), None) => {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidArgument(format!("invalid weight: {weight}")));
            }
            if reps == 0 {
                return Err(Error::InvalidArgument("reps must be at least 1".to_string()));
            }
            Ok(EntryLine::Strength {
                exercise: exercise.to_string(),
                weight,
                unit: args.unit,
                reps,
                set: args.set,
            })
        }
        (None, None, Some(minutes)) => {
            if !minutes.is_finite() || minutes <= 0.0 {
                return Err(Error::InvalidArgument(format!("invalid minutes: {minutes}")));
            }
            if let Some(d) = args.distance.filter(|d| !d.is_finite() || *d < 0.0) {
                return Err(Error::InvalidArgument(format!("invalid distance: {d}")));
            }
            Ok(EntryLine::Cardio {
                exercise: exercise.to_string(),
                minutes,
                distance: args.distance,
            })
        }
        _ => Err(Error::InvalidArgument(
            "give either --weight and --reps, or --minutes".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeightUnit;

    fn args(exercise: &str) -> AddArgs {
        AddArgs {
            exercise: exercise.to_string(),
            weight: None,
            reps: None,
            unit: WeightUnit::Lbs,
            set: None,
            minutes: None,
            distance: None,
            date: None,
        }
    }

    #[test]
    fn test_strength_line() {
        let mut a = args("Bench Press");
        a.weight = Some(185.0);
        a.reps = Some(5);
        a.set = Some(2);
        assert_eq!(
            build_line(&a).unwrap().to_line(),
            "Set 2 - Bench Press: 185 lbs × 5 reps"
        );
    }

    #[test]
    fn test_cardio_line() {
        let mut a = args("Run");
        a.minutes = Some(30.0);
        a.distance = Some(3.1);
        assert_eq!(build_line(&a).unwrap().to_line(), "Run: 3.1 mi in 30 min");
    }

    #[test]
    fn test_incomplete_or_invalid_sets_rejected() {
        assert!(matches!(build_line(&args("Squat")), Err(Error::InvalidArgument(_))));

        let mut a = args("Squat");
        a.weight = Some(f64::NAN);
        a.reps = Some(3);
        assert!(matches!(build_line(&a), Err(Error::InvalidArgument(_))));

        let mut a = args("Squat: heavy");
        a.weight = Some(225.0);
        a.reps = Some(3);
        assert!(matches!(build_line(&a), Err(Error::InvalidArgument(_))));

        let mut a = args("Row");
        a.minutes = Some(0.0);
        assert!(matches!(build_line(&a), Err(Error::InvalidArgument(_))));
    }
}
