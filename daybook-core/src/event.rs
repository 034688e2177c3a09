//! Event types.
//!
//! Timestamps are offset-naive and, unless stated otherwise, represent UTC.
//! The local-time adapter reuses the same types with local wall-clock values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub all_day: bool,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Event {
    /// Copy of this event with `start` and `end` replaced.
    pub fn with_times(self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Event { start, end, ..self }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title.as_deref().unwrap_or("(untitled)"))
    }
}

/// Arguments for adding an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub all_day: bool,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl NewEvent {
    pub fn new(title: Option<&str>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        NewEvent {
            title: title.map(str::to_string),
            description: None,
            all_day: false,
            start,
            end,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn with_times(self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        NewEvent { start, end, ..self }
    }
}

/// A partial update: only fields that are `Some` get written.
///
/// `start`, `end` and `all_day` travel together. Supplying any one of
/// them requires supplying all three.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub all_day: Option<bool>,
}

impl EventUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = Some(all_day);
        self
    }

    /// Sets the whole time trio at once.
    pub fn times(self, start: NaiveDateTime, end: NaiveDateTime, all_day: bool) -> Self {
        self.start(start).end(end).all_day(all_day)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && !self.touches_times()
    }

    /// True if any of `start`, `end` or `all_day` is present.
    pub fn touches_times(&self) -> bool {
        self.start.is_some() || self.end.is_some() || self.all_day.is_some()
    }
}
