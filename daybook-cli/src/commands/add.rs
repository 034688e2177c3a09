use anyhow::Result;
use daybook_core::{LocalCalendar, NewEvent};
use owo_colors::OwoColorize;

use crate::parse::DateTimeInput;

pub fn run(
    calendar: &LocalCalendar,
    title: Option<String>,
    start: DateTimeInput,
    end: DateTimeInput,
    description: Option<String>,
    all_day: bool,
) -> Result<()> {
    let tz = calendar.timezone();
    let mut event = NewEvent::new(title.as_deref(), start.to_local(tz), end.to_local(tz))
        .all_day(all_day);
    if let Some(description) = description {
        event = event.description(description);
    }

    let id = calendar.add(&event)?;

    println!("{} {}", "Added event".green(), id.to_string().bold());
    Ok(())
}
