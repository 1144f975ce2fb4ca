//! Template commands.
//!
//! Templates are stored as name → JSON value. `wt template save` writes an
//! array of exercise names; values received through sync are kept as-is.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use super::open_storage;
use crate::cli::TemplateCommands;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::model::Templates;
use crate::storage::SqliteStorage;

#[derive(Serialize)]
struct TemplateListOutput<'a> {
    templates: &'a Templates,
    count: usize,
}

/// Execute template commands.
pub fn execute(command: &TemplateCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    match command {
        TemplateCommands::List => list(&mut storage, json),
        TemplateCommands::Save { name, exercises } => save(&mut storage, name, exercises, json),
        TemplateCommands::Delete { name } => delete(&mut storage, name, json),
    }
}

fn list(storage: &mut SqliteStorage, json: bool) -> Result<()> {
    let templates = HistoryStore::new(storage).read_templates()?;

    if crate::is_csv() {
        println!("name,exercises");
        for (name, value) in &templates {
            println!("{},{}", crate::csv_escape(name), crate::csv_escape(&describe(value)));
        }
    } else if json {
        let output = TemplateListOutput {
            templates: &templates,
            count: templates.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if templates.is_empty() {
        println!("No templates saved.");
    } else {
        println!("Templates ({} found):", templates.len());
        for (name, value) in &templates {
            println!("  {name}: {}", describe(value));
        }
    }
    Ok(())
}

fn save(storage: &mut SqliteStorage, name: &str, exercises: &[String], json: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("template name is empty".to_string()));
    }
    let exercises: Vec<Value> = exercises
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| Value::String(e.to_string()))
        .collect();
    if exercises.is_empty() {
        return Err(Error::InvalidArgument("template has no exercises".to_string()));
    }

    if crate::is_dry_run() {
        println!("Would save template {name} ({} exercises)", exercises.len());
        return Ok(());
    }

    let mut store = HistoryStore::new(storage);
    let mut templates = store.read_templates()?;
    let count = exercises.len();
    templates.insert(name.to_string(), Value::Array(exercises));
    store.save_templates(&templates)?;

    if json {
        println!("{}", serde_json::json!({ "name": name, "exercises": count }));
    } else {
        println!("Saved template {name} ({count} exercises)");
    }
    Ok(())
}

fn delete(storage: &mut SqliteStorage, name: &str, json: bool) -> Result<()> {
    let mut store = HistoryStore::new(storage);
    let mut templates = store.read_templates()?;
    if !templates.contains_key(name) {
        return Err(Error::TemplateNotFound(name.to_string()));
    }

    if crate::is_dry_run() {
        println!("Would delete template {name}");
        return Ok(());
    }

    templates.shift_remove(name);
    store.save_templates(&templates)?;

    if json {
        println!("{}", serde_json::json!({ "name": name, "deleted": true }));
    } else {
        println!("Deleted template {name}");
    }
    Ok(())
}

/// One-line rendering of a template value.
fn describe(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map_or_else(|| v.to_string(), ToString::to_string))
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(describe(&serde_json::json!(["Bench Press", "Squat"])), "Bench Press, Squat");
        assert_eq!(describe(&serde_json::json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_save_and_delete() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        save(&mut storage, "push", &["Bench Press".into(), " ".into(), "Dips".into()], false).unwrap();

        let templates = HistoryStore::new(&mut storage).read_templates().unwrap();
        assert_eq!(templates["push"], serde_json::json!(["Bench Press", "Dips"]));

        delete(&mut storage, "push", false).unwrap();
        assert!(matches!(
            delete(&mut storage, "push", false),
            Err(Error::TemplateNotFound(_))
        ));
    }
}
