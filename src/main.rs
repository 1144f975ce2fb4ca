//! wt CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use wt::cli::commands;
use wt::cli::{Cli, Commands, OutputFormat};
use wt::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.dry_run {
        wt::DRY_RUN.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.format == OutputFormat::Csv {
        wt::CSV_OUTPUT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR --format json
    let json = cli.json || cli.format == OutputFormat::Json;

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let db = cli.db.as_ref();
    match &cli.command {
        Commands::Init { force } => commands::init::execute(db, *force, json),
        Commands::Version => commands::version::execute(json),

        // Entries
        Commands::Add(args) => commands::add::execute(args, db, json),
        Commands::Show { date, all } => commands::show::execute(date.as_deref(), *all, db, json),
        Commands::Edit { date, index, text } => {
            commands::entries::edit(date, *index, text, db, json)
        }
        Commands::Remove { date, index } => commands::entries::remove(date, *index, db, json),
        Commands::Clear { date } => commands::entries::clear(date, db, json),

        // Import / export
        Commands::Import { file, date } => {
            commands::import::execute(file.as_deref(), date.as_deref(), db, json)
        }
        Commands::Export { file, envelope } => {
            commands::export::execute(file.as_deref(), *envelope, db, json)
        }

        Commands::Template { command } => commands::template::execute(command, db, json),
        Commands::Sync { command } => commands::sync::execute(command, db, json),

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
