//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::model::WeightUnit;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// wt - workout log import, merge and sync
#[derive(Parser, Debug)]
#[command(name = "wt", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.wt/data/wt.db)
    #[arg(long, global = true, env = "WT_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Preview changes without writing to the database
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and database
    Init {
        /// Overwrite existing database
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Log a single strength or cardio set
    Add(AddArgs),

    /// Show logged entries
    Show {
        /// Date to show (default: today)
        #[arg(long, conflicts_with = "all")]
        date: Option<String>,

        /// Show every date
        #[arg(long)]
        all: bool,
    },

    /// Replace an entry line
    Edit {
        /// Date of the entry (YYYY-MM-DD)
        date: String,

        /// 1-based entry number, as listed by `wt show`
        index: usize,

        /// New line text
        text: String,
    },

    /// Remove an entry line
    Remove {
        /// Date of the entry (YYYY-MM-DD)
        date: String,

        /// 1-based entry number, as listed by `wt show`
        index: usize,
    },

    /// Remove every entry on a date
    Clear {
        /// Date to clear (YYYY-MM-DD)
        date: String,
    },

    /// Import pasted or exported workout data (JSON, AI text, CSV)
    Import {
        /// File to read (default: stdin)
        file: Option<PathBuf>,

        /// Date for formats that do not carry one (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Export history as JSON
    Export {
        /// Output file (default: stdout)
        file: Option<PathBuf>,

        /// Include templates and updatedAt (the sync envelope)
        #[arg(long)]
        envelope: bool,
    },

    /// Workout templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// Sync with the remote server
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Exercise name
    pub exercise: String,

    /// Weight lifted
    #[arg(long, requires = "reps", conflicts_with_all = ["minutes", "distance"])]
    pub weight: Option<f64>,

    /// Repetitions
    #[arg(long, requires = "weight")]
    pub reps: Option<u32>,

    /// Weight unit
    #[arg(long, value_enum, default_value_t)]
    pub unit: WeightUnit,

    /// Set number (prefixes the line with "Set N - ")
    #[arg(long, requires = "weight")]
    pub set: Option<u32>,

    /// Cardio duration in minutes
    #[arg(long)]
    pub minutes: Option<f64>,

    /// Cardio distance in miles
    #[arg(long, requires = "minutes")]
    pub distance: Option<f64>,

    /// Date to log under (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List saved templates
    List,

    /// Save a template as a list of exercises
    Save {
        /// Template name
        name: String,

        /// Exercises, in order
        #[arg(required = true)]
        exercises: Vec<String>,
    },

    /// Delete a template
    Delete {
        /// Template name
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    /// Log in and store an auth token
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "WT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored auth token
    Logout,

    /// Upload local data (the newer side wins)
    Push,

    /// Replace local data with the server copy
    Pull,

    /// Show sync status
    Status,
}
