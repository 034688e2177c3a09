//! Terminal rendering for events.
//!
//! Events arrive here already converted to local time.

use chrono::{Duration, NaiveDate};
use daybook_core::Event;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let title = self.to_string();
        let title = if self.title.is_some() {
            title
        } else {
            title.dimmed().to_string()
        };

        match &self.description {
            Some(description) => format!("{} {}", title, description.dimmed()),
            None => title,
        }
    }
}

/// Render events grouped under day headings. With `verbose`, each line is
/// prefixed with the event id.
pub fn render_agenda(events: &[Event], today: NaiveDate, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for event in events {
        let date = event.start.date();

        if current_date != Some(date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(format_date_label(date, today).bold().to_string());
            current_date = Some(date);
        }

        let time = format_time(event);
        if verbose {
            let id = format!("{:>7}", event.id);
            lines.push(format!("  {} {} {}", id.dimmed(), time, event.render()));
        } else {
            lines.push(format!("  {} {}", time, event.render()));
        }
    }

    lines
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}

/// Format the time span of an event (e.g. "15:00-16:30" or "all-day").
pub fn format_time(event: &Event) -> String {
    if event.all_day {
        let days = event.duration().num_days();
        return if days > 1 {
            format!("{:<11}", format!("{} days", days))
        } else {
            format!("{:<11}", "all-day")
        };
    }

    let end = if event.end.date() == event.start.date() {
        event.end.format("%H:%M").to_string()
    } else if event.end.date() == event.start.date() + Duration::days(1)
        && event.end.time() == chrono::NaiveTime::default()
    {
        "24:00".to_string()
    } else {
        event.end.format("%b %-d %H:%M").to_string()
    };

    format!("{}-{}", event.start.format("%H:%M"), end)
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, 4, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn event(id: i64, title: &str, start: NaiveDateTime, end: NaiveDateTime, all_day: bool) -> Event {
        Event {
            id,
            title: Some(title.to_string()),
            description: None,
            all_day,
            start,
            end,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 4, 3).unwrap()
    }

    #[test]
    fn date_labels() {
        let d = |n| NaiveDate::from_ymd_opt(2017, 4, n).unwrap();
        assert_eq!(format_date_label(d(3), today()), "Today");
        assert_eq!(format_date_label(d(4), today()), "Tomorrow");
        assert_eq!(format_date_label(d(2), today()), "Yesterday");
        assert_eq!(format_date_label(d(7), today()), "Fri Apr 7 2017");
    }

    #[test]
    fn time_spans() {
        assert_eq!(format_time(&event(1, "a", at(1, 9, 0), at(1, 10, 30), false)), "09:00-10:30");
        assert_eq!(format_time(&event(1, "a", at(1, 22, 0), at(2, 0, 0), false)), "22:00-24:00");
        assert_eq!(format_time(&event(1, "a", at(1, 22, 0), at(3, 1, 0), false)), "22:00-Apr 3 01:00");
        assert_eq!(format_time(&event(1, "a", at(1, 0, 0), at(2, 0, 0), true)).trim_end(), "all-day");
        assert_eq!(format_time(&event(1, "a", at(1, 0, 0), at(4, 0, 0), true)).trim_end(), "3 days");
    }

    #[test]
    fn agenda_groups_by_day() {
        let events = [
            event(1, "standup", at(3, 9, 0), at(3, 9, 15), false),
            event(2, "lunch", at(3, 12, 0), at(3, 13, 0), false),
            event(3, "trip", at(5, 0, 0), at(6, 0, 0), true),
        ];

        let lines = render_agenda(&events, today(), false);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Today"));
        assert!(lines[1].contains("standup"));
        assert!(lines[2].contains("lunch"));
        assert!(lines[3].is_empty());
        assert!(lines[4].contains("trip"));
    }

    #[test]
    fn verbose_agenda_shows_ids() {
        let events = [event(42, "standup", at(3, 9, 0), at(3, 9, 15), false)];
        let lines = render_agenda(&events, today(), true);
        assert!(lines[1].contains("42"));
        assert!(!render_agenda(&events, today(), false)[1].contains("42"));
    }

    #[test]
    fn plurals() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 3), "events");
    }
}
