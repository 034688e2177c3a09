mod commands;
mod parse;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daybook_core::config::DaybookConfig;
use daybook_core::local::resolve_timezone;
use daybook_core::{Calendar, LocalCalendar};
use tracing_subscriber::EnvFilter;

use crate::parse::{DateTimeInput, parse_datetime};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Keep track of your events in a local calendar")]
struct Cli {
    /// Database file (defaults to the per-user data directory)
    #[arg(long, global = true, env = "DAYBOOK_DB")]
    db: Option<PathBuf>,

    /// IANA timezone for reading and printing times (e.g. "Europe/Brussels")
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Log filter, e.g. "debug" or "daybook_core=trace" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an event
    Add {
        #[arg(short, long)]
        title: Option<String>,

        /// Start date/time (e.g., "2025-03-20T15:00", "tomorrow 3pm")
        #[arg(short, long, value_parser = parse_datetime)]
        start: DateTimeInput,

        /// End date/time
        #[arg(short, long, value_parser = parse_datetime)]
        end: DateTimeInput,

        #[arg(short, long)]
        description: Option<String>,

        /// Whole-day event: start and end must be local midnights
        #[arg(long)]
        all_day: bool,
    },
    /// List events overlapping a time window
    Show {
        /// Window start (defaults to today)
        #[arg(short, long, value_parser = parse_datetime)]
        start: Option<DateTimeInput>,

        /// Window end (defaults to three days after the start)
        #[arg(short, long, value_parser = parse_datetime)]
        end: Option<DateTimeInput>,

        /// Show event ids
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing event
    Update {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, value_parser = parse_datetime)]
        start: Option<DateTimeInput>,

        #[arg(short, long, value_parser = parse_datetime)]
        end: Option<DateTimeInput>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long, conflicts_with = "no_all_day")]
        all_day: bool,

        #[arg(long)]
        no_all_day: bool,
    },
    /// Delete an event
    Delete { id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let config = DaybookConfig::load()?;
    let db_path = match cli.db {
        Some(path) => path,
        None => config.db_path()?,
    };
    let tz = match cli.tz.as_deref() {
        Some(name) => resolve_timezone(name)?,
        None => config.timezone()?,
    };
    tracing::debug!(db = %db_path.display(), %tz, "opening calendar");

    let calendar = Calendar::open(&db_path)
        .with_context(|| format!("Failed to open calendar at {}", db_path.display()))?;
    let calendar = LocalCalendar::new(calendar, tz);

    match cli.command {
        Commands::Add {
            title,
            start,
            end,
            description,
            all_day,
        } => commands::add::run(&calendar, title, start, end, description, all_day),
        Commands::Show {
            start,
            end,
            verbose,
            json,
        } => commands::show::run(&calendar, start, end, verbose > 0, json),
        Commands::Update {
            id,
            title,
            start,
            end,
            description,
            all_day,
            no_all_day,
        } => {
            let all_day = match (all_day, no_all_day) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let changes = commands::update::Changes {
                title,
                start,
                end,
                description,
                all_day,
            };
            commands::update::run(&calendar, id, changes)
        }
        Commands::Delete { id } => commands::delete::run(&calendar, id),
    }
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log level: {}", directives))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
