//! Local wall-clock time on top of a UTC calendar.
//!
//! `LocalCalendar` converts caller datetimes from a fixed IANA timezone to
//! the naive UTC values the store keeps, and converts results back. All-day
//! events must also sit on local midnights, which the UTC whole-day check
//! alone does not guarantee.

use chrono::{LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use std::str::FromStr;

use crate::calendar::Calendar;
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventUpdate, NewEvent};
use crate::window::is_midnight;

/// Parse an IANA timezone identifier such as `Europe/Brussels`.
pub fn resolve_timezone(name: &str) -> CalendarResult<Tz> {
    Tz::from_str(name.trim()).map_err(|_| CalendarError::UnknownTimezone(name.to_string()))
}

/// The host's timezone, or UTC if it cannot be determined.
pub fn system_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => resolve_timezone(&name).unwrap_or_else(|e| {
            tracing::warn!("{}, falling back to UTC", e);
            Tz::UTC
        }),
        Err(e) => {
            tracing::warn!("could not determine system timezone ({}), falling back to UTC", e);
            Tz::UTC
        }
    }
}

/// Interpret `local` as wall-clock time in `tz` and return naive UTC.
///
/// A time repeated by a DST fold resolves to the standard-time instant. A
/// time skipped by a DST gap is read with the zone's standard offset.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> NaiveDateTime {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.naive_utc(),
        LocalResult::Ambiguous(earliest, latest) => {
            if earliest.offset().dst_offset().is_zero() {
                earliest.naive_utc()
            } else {
                latest.naive_utc()
            }
        }
        LocalResult::None => {
            let standard = tz.offset_from_utc_datetime(&local).base_utc_offset();
            local - standard
        }
    }
}

/// Convert naive UTC to naive wall-clock time in `tz`.
pub fn utc_to_local(utc: NaiveDateTime, tz: Tz) -> NaiveDateTime {
    Utc.from_utc_datetime(&utc).with_timezone(&tz).naive_local()
}

/// A calendar whose inputs and outputs are local times in one timezone.
pub struct LocalCalendar {
    calendar: Calendar,
    tz: Tz,
}

impl LocalCalendar {
    pub fn new(calendar: Calendar, tz: Tz) -> Self {
        LocalCalendar { calendar, tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn into_inner(self) -> Calendar {
        self.calendar
    }

    pub fn local_to_utc(&self, local: NaiveDateTime) -> NaiveDateTime {
        local_to_utc(local, self.tz)
    }

    pub fn utc_to_local(&self, utc: NaiveDateTime) -> NaiveDateTime {
        utc_to_local(utc, self.tz)
    }

    /// Add an event given in local time. Returns its id.
    pub fn add(&self, event: &NewEvent) -> CalendarResult<i64> {
        if event.all_day {
            require_midnights(event.start, event.end)?;
        }

        let utc = event
            .clone()
            .with_times(self.local_to_utc(event.start), self.local_to_utc(event.end));
        self.calendar.add(&utc)
    }

    /// Events intersecting the local window `[start, end)`, in local time.
    ///
    /// A window starting inside a DST gap can map to a reversed UTC window.
    /// It covers no instant and yields no events.
    pub fn get(&self, start: NaiveDateTime, end: NaiveDateTime) -> CalendarResult<Vec<Event>> {
        if start > end {
            return Err(CalendarError::InvalidArgument(
                "window start cannot be later than window end".into(),
            ));
        }

        let (utc_start, utc_end) = (self.local_to_utc(start), self.local_to_utc(end));
        if utc_start > utc_end {
            tracing::debug!(%start, %end, tz = %self.tz, "window falls in a DST gap");
            return Ok(Vec::new());
        }

        let events = self.calendar.get(utc_start, utc_end)?;

        Ok(events.into_iter().map(|e| self.localize(e)).collect())
    }

    /// Look up a single event, in local time.
    pub fn get_event(&self, id: i64) -> CalendarResult<Option<Event>> {
        Ok(self.calendar.get_event(id)?.map(|e| self.localize(e)))
    }

    /// Partial update with local times.
    pub fn update(&self, id: i64, update: &EventUpdate) -> CalendarResult<usize> {
        if update.all_day == Some(true) {
            let (Some(start), Some(end)) = (update.start, update.end) else {
                return Err(CalendarError::MissingArgument(
                    "all-day updates need both start and end".into(),
                ));
            };
            require_midnights(start, end)?;
        }

        let utc = EventUpdate {
            start: update.start.map(|dt| self.local_to_utc(dt)),
            end: update.end.map(|dt| self.local_to_utc(dt)),
            ..update.clone()
        };
        self.calendar.update(id, &utc)
    }

    pub fn delete(&self, id: i64) -> CalendarResult<usize> {
        self.calendar.delete(id)
    }

    fn localize(&self, event: Event) -> Event {
        let start = self.utc_to_local(event.start);
        let end = self.utc_to_local(event.end);
        event.with_times(start, end)
    }
}

fn require_midnights(start: NaiveDateTime, end: NaiveDateTime) -> CalendarResult<()> {
    if !is_midnight(start) || !is_midnight(end) {
        return Err(CalendarError::InvalidArgument(
            "all-day events must start and end at local midnight".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn brussels() -> Tz {
        resolve_timezone("Europe/Brussels").unwrap()
    }

    fn calendar(tz: Tz) -> LocalCalendar {
        LocalCalendar::new(Calendar::open_in_memory().unwrap(), tz)
    }

    #[test]
    fn resolve_known_and_unknown_zones() {
        assert_eq!(brussels(), Tz::Europe__Brussels);
        assert!(matches!(
            resolve_timezone("Mars/Olympus_Mons"),
            Err(CalendarError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn converts_winter_and_summer_offsets() {
        let tz = brussels();
        assert_eq!(local_to_utc(dt(2017, 1, 10, 12, 0), tz), dt(2017, 1, 10, 11, 0));
        assert_eq!(local_to_utc(dt(2017, 7, 10, 12, 0), tz), dt(2017, 7, 10, 10, 0));
        assert_eq!(utc_to_local(dt(2017, 7, 10, 10, 0), tz), dt(2017, 7, 10, 12, 0));
    }

    #[test]
    fn fold_resolves_to_standard_time() {
        // 2017-10-29 02:30 happens twice in Brussels.
        let utc = local_to_utc(dt(2017, 10, 29, 2, 30), brussels());
        assert_eq!(utc, dt(2017, 10, 29, 1, 30));
    }

    #[test]
    fn gap_uses_standard_offset() {
        // 2017-03-26 02:30 does not exist in Brussels.
        let utc = local_to_utc(dt(2017, 3, 26, 2, 30), brussels());
        assert_eq!(utc, dt(2017, 3, 26, 1, 30));
    }

    #[test]
    fn round_trip_outside_gaps() {
        let tz = brussels();
        let mut local = dt(2017, 1, 1, 0, 0);
        while local < dt(2018, 1, 1, 0, 0) {
            let in_gap = local >= dt(2017, 3, 26, 2, 0) && local < dt(2017, 3, 26, 3, 0);
            let in_fold = local >= dt(2017, 10, 29, 2, 0) && local < dt(2017, 10, 29, 3, 0);
            if !in_gap && !in_fold {
                assert_eq!(utc_to_local(local_to_utc(local, tz), tz), local, "{local}");
            }
            local += Duration::minutes(97);
        }
    }

    #[test]
    fn add_all_day_requires_local_midnight() {
        let cal = calendar(brussels());
        let err = cal
            .add(&NewEvent::new(Some("one"), dt(1900, 1, 1, 1, 0), dt(1900, 1, 2, 1, 0)).all_day(true))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn add_all_day_rejects_whole_utc_days_off_local_midnight() {
        // Kolkata is UTC+05:30: local 05:30 is UTC midnight, a whole UTC day
        // apart but not a local all-day span.
        let tz = resolve_timezone("Asia/Kolkata").unwrap();
        let cal = calendar(tz);
        let err = cal
            .add(&NewEvent::new(Some("x"), dt(2017, 4, 1, 5, 30), dt(2017, 4, 2, 5, 30)).all_day(true))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        cal.add(&NewEvent::new(Some("ok"), dt(2017, 4, 1, 0, 0), dt(2017, 4, 2, 0, 0)).all_day(true))
            .unwrap();
    }

    #[test]
    fn all_day_over_dst_change_is_not_whole_utc_days() {
        // Local midnight to midnight on 2017-03-26 is 23 hours in UTC.
        let cal = calendar(brussels());
        let err = cal
            .add(&NewEvent::new(Some("x"), dt(2017, 3, 26, 0, 0), dt(2017, 3, 27, 0, 0)).all_day(true))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn get_inside_dst_gap_is_empty() {
        let cal = calendar(brussels());
        cal.add(&NewEvent::new(Some("night"), dt(2017, 3, 26, 0, 0), dt(2017, 3, 26, 6, 0)))
            .unwrap();

        let events = cal.get(dt(2017, 3, 26, 2, 30), dt(2017, 3, 26, 3, 0)).unwrap();
        assert!(events.is_empty());

        let events = cal.get(dt(2017, 3, 26, 1, 0), dt(2017, 3, 26, 4, 0)).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn get_rejects_reversed_local_window() {
        let cal = calendar(brussels());
        let err = cal
            .get(dt(2017, 4, 2, 0, 0), dt(2017, 4, 1, 0, 0))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn stores_utc_and_returns_local() {
        let cal = calendar(brussels());
        let id = cal
            .add(&NewEvent::new(Some("lunch"), dt(2017, 7, 10, 12, 0), dt(2017, 7, 10, 13, 0)))
            .unwrap();

        let raw = cal.calendar().get_event(id).unwrap().unwrap();
        assert_eq!(raw.start, dt(2017, 7, 10, 10, 0));

        let events = cal.get(dt(2017, 7, 10, 0, 0), dt(2017, 7, 11, 0, 0)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, dt(2017, 7, 10, 12, 0));
        assert_eq!(events[0].end, dt(2017, 7, 10, 13, 0));
        assert_eq!(events[0].title.as_deref(), Some("lunch"));
    }

    #[test]
    fn update_all_day_requires_local_midnight() {
        let cal = calendar(brussels());
        let id = cal
            .add(&NewEvent::new(Some("one"), dt(1900, 1, 1, 0, 0), dt(1900, 1, 2, 1, 0)))
            .unwrap();

        let err = cal
            .update(
                id,
                &EventUpdate::new().times(dt(1900, 1, 1, 1, 0), dt(1900, 1, 2, 1, 0), true),
            )
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn update_all_day_without_times_is_missing_argument() {
        let cal = calendar(brussels());
        let id = cal
            .add(&NewEvent::new(Some("one"), dt(2017, 4, 1, 0, 0), dt(2017, 4, 2, 0, 0)))
            .unwrap();

        let err = cal.update(id, &EventUpdate::new().all_day(true)).unwrap_err();
        assert!(err.is_missing_argument());

        let err = cal
            .update(id, &EventUpdate::new().start(dt(2017, 4, 3, 0, 0)).all_day(true))
            .unwrap_err();
        assert!(err.is_missing_argument());
    }

    #[test]
    fn update_converts_times() {
        let cal = calendar(brussels());
        let id = cal
            .add(&NewEvent::new(Some("one"), dt(2017, 4, 1, 9, 0), dt(2017, 4, 1, 10, 0)))
            .unwrap();

        let changed = cal
            .update(
                id,
                &EventUpdate::new().times(dt(2017, 4, 3, 0, 0), dt(2017, 4, 4, 0, 0), true),
            )
            .unwrap();
        assert_eq!(changed, 1);

        let raw = cal.calendar().get_event(id).unwrap().unwrap();
        assert_eq!(raw.start, dt(2017, 4, 2, 22, 0));
        let local = cal.get_event(id).unwrap().unwrap();
        assert_eq!((local.start, local.end), (dt(2017, 4, 3, 0, 0), dt(2017, 4, 4, 0, 0)));
        assert!(local.all_day);
    }
}
