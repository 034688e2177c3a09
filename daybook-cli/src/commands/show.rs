use anyhow::Result;
use chrono::{Duration, NaiveTime};
use daybook_core::LocalCalendar;
use owo_colors::OwoColorize;

use crate::parse::DateTimeInput;
use crate::render::{pluralize, render_agenda};

/// Default window length when no end is given.
const DEFAULT_DAYS: i64 = 3;

pub fn run(
    calendar: &LocalCalendar,
    start: Option<DateTimeInput>,
    end: Option<DateTimeInput>,
    verbose: bool,
    json: bool,
) -> Result<()> {
    let tz = calendar.timezone();
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();

    let start = match start {
        Some(input) => input.to_local(tz),
        None => today.and_time(NaiveTime::default()),
    };
    let end = match end {
        Some(input) => input.to_local(tz),
        None => start + Duration::days(DEFAULT_DAYS),
    };

    let events = calendar.get(start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for line in render_agenda(&events, today, verbose) {
        println!("{}", line);
    }
    if verbose {
        println!();
        println!(
            "{}",
            format!("{} {}", events.len(), pluralize("event", events.len())).dimmed()
        );
    }

    Ok(())
}
