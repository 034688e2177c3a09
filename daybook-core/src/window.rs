//! Time windows and the interval rules shared by the calendar layers.
//!
//! Intervals are half-open, `[start, end)`: an event ending where the
//! window starts, or starting where the window ends, does not intersect it.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::error::{CalendarError, CalendarResult};

/// Query window for `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CalendarResult<Self> {
        if start > end {
            return Err(CalendarError::InvalidArgument(
                "window start cannot be later than window end".into(),
            ));
        }
        Ok(TimeWindow { start, end })
    }

    /// Whether an event spanning `[start, end)` intersects this window.
    ///
    /// Same four cases as the SQL predicate in `Calendar::get`. Their union
    /// is `start < self.end && end > self.start`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let intersects = start < self.end && end > self.start;

        let event_contains_window = start <= self.start && end >= self.end;
        let window_contains_event = self.start <= start && end <= self.end;
        let starts_inside = self.start <= start && start < self.end;
        let ends_inside = self.start < end && end <= self.end;

        intersects
            && (event_contains_window || window_contains_event || starts_inside || ends_inside)
    }
}

/// True if `end - start` is an exact number of 24-hour days.
pub fn is_whole_days(start: NaiveDateTime, end: NaiveDateTime) -> bool {
    let gap = end - start;
    gap - Duration::days(gap.num_days()) == Duration::zero()
}

/// True if the wall-clock time is exactly 00:00:00.000000000.
pub fn is_midnight(datetime: NaiveDateTime) -> bool {
    datetime.time() == NaiveTime::default()
}
