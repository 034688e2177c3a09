use anyhow::{Result, bail};
use daybook_core::{EventUpdate, LocalCalendar};
use owo_colors::OwoColorize;

use crate::parse::DateTimeInput;
use crate::render::Render;

/// Fields given on the command line.
pub struct Changes {
    pub title: Option<String>,
    pub start: Option<DateTimeInput>,
    pub end: Option<DateTimeInput>,
    pub description: Option<String>,
    pub all_day: Option<bool>,
}

pub fn run(calendar: &LocalCalendar, id: i64, changes: Changes) -> Result<()> {
    let tz = calendar.timezone();

    let Some(existing) = calendar.get_event(id)? else {
        bail!("No event with id {}", id);
    };

    let mut update = EventUpdate {
        title: changes.title,
        description: changes.description,
        ..EventUpdate::default()
    };

    // The time fields are written together, so fill in whichever of them
    // were not given from the stored event.
    if changes.start.is_some() || changes.end.is_some() || changes.all_day.is_some() {
        update = update.times(
            changes.start.map_or(existing.start, |s| s.to_local(tz)),
            changes.end.map_or(existing.end, |e| e.to_local(tz)),
            changes.all_day.unwrap_or(existing.all_day),
        );
    }

    if update.is_empty() {
        println!("{}", "Nothing to update".dimmed());
        return Ok(());
    }

    let changed = calendar.update(id, &update)?;
    if changed == 0 {
        bail!("No event with id {}", id);
    }

    println!("{} {}", "Updated event".green(), id);
    if let Some(event) = calendar.get_event(id)? {
        println!("  {}", event.render());
    }

    Ok(())
}
