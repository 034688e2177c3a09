use anyhow::Result;
use daybook_core::LocalCalendar;
use owo_colors::OwoColorize;

pub fn run(calendar: &LocalCalendar, id: i64) -> Result<()> {
    if calendar.delete(id)? > 0 {
        println!("{} {}", "Deleted event".green(), id);
    } else {
        println!("{}", format!("No event with id {}", id).dimmed());
    }

    Ok(())
}
