//! Event storage and overlap queries on absolute (UTC) time.

use chrono::NaiveDateTime;
use rusqlite::types::ToSql;
use rusqlite::{OptionalExtension, Row, named_params};
use std::path::Path;

use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventUpdate, NewEvent};
use crate::store::{Store, decode_timestamp, encode_timestamp};
use crate::window::{TimeWindow, is_whole_days};

const SELECT_EVENT: &str = "SELECT id, title, description, all_day, start, end FROM events";

// Half-open intersection, `start < :end AND end > :start`, spelled out as
// its four cases. Kept in step with `TimeWindow::overlaps`.
const OVERLAP_PREDICATE: &str = "
    start < :end AND end > :start AND (
        (start <= :start AND end >= :end)
        OR (start >= :start AND end <= :end)
        OR (start >= :start AND start < :end)
        OR (end > :start AND end <= :end)
    )
";

/// Calendar over a store. All timestamps are offset-naive UTC.
pub struct Calendar {
    store: Store,
}

impl Calendar {
    pub fn new(store: Store) -> Self {
        Calendar { store }
    }

    pub fn open(path: impl AsRef<Path>) -> CalendarResult<Self> {
        Ok(Calendar::new(Store::open(path)?))
    }

    pub fn open_in_memory() -> CalendarResult<Self> {
        Ok(Calendar::new(Store::open_in_memory()?))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Add an event and return its id.
    pub fn add(&self, event: &NewEvent) -> CalendarResult<i64> {
        let (start, end, all_day) =
            validate_times(Some(event.start), Some(event.end), Some(event.all_day))?;

        let id = self.store.write(|tx| {
            tx.execute(
                "INSERT INTO events (title, description, all_day, start, end)
                 VALUES (:title, :description, :all_day, :start, :end)",
                named_params! {
                    ":title": event.title,
                    ":description": event.description,
                    ":all_day": all_day,
                    ":start": encode_timestamp(start),
                    ":end": encode_timestamp(end),
                },
            )?;
            Ok::<_, CalendarError>(tx.last_insert_rowid())
        })?;

        tracing::debug!(id, %start, %end, all_day, "added event");
        Ok(id)
    }

    /// Events intersecting `[start, end)`, ordered by start then end.
    pub fn get(&self, start: NaiveDateTime, end: NaiveDateTime) -> CalendarResult<Vec<Event>> {
        let window = TimeWindow::new(start, end)?;
        let sql = format!(
            "{} WHERE {} ORDER BY start ASC, end ASC, id ASC",
            SELECT_EVENT, OVERLAP_PREDICATE
        );

        self.store.read(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    named_params! {
                        ":start": encode_timestamp(window.start),
                        ":end": encode_timestamp(window.end),
                    },
                    EventRow::from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter().map(EventRow::into_event).collect()
        })
    }

    /// Look up a single event by id.
    pub fn get_event(&self, id: i64) -> CalendarResult<Option<Event>> {
        let row = self.store.read(|conn| {
            conn.query_row(
                &format!("{} WHERE id = :id", SELECT_EVENT),
                named_params! { ":id": id },
                EventRow::from_row,
            )
            .optional()
        })?;

        row.map(EventRow::into_event).transpose()
    }

    /// Delete an event. Returns the number of rows removed (0 or 1).
    pub fn delete(&self, id: i64) -> CalendarResult<usize> {
        let removed = self.store.write(|tx| {
            tx.execute("DELETE FROM events WHERE id = :id", named_params! { ":id": id })
        })?;

        tracing::debug!(id, removed, "deleted event");
        Ok(removed)
    }

    /// Apply a partial update. Returns the number of rows changed (0 or 1).
    ///
    /// If any of `start`, `end`, `all_day` is given, all three must be.
    pub fn update(&self, id: i64, update: &EventUpdate) -> CalendarResult<usize> {
        let mut columns: Vec<(&str, Box<dyn ToSql>)> = Vec::new();

        if let Some(title) = &update.title {
            columns.push(("title", Box::new(title.clone())));
        }
        if let Some(description) = &update.description {
            columns.push(("description", Box::new(description.clone())));
        }
        if update.touches_times() {
            let (start, end, all_day) = validate_times(update.start, update.end, update.all_day)?;
            columns.push(("start", Box::new(encode_timestamp(start))));
            columns.push(("end", Box::new(encode_timestamp(end))));
            columns.push(("all_day", Box::new(all_day)));
        }

        if columns.is_empty() {
            return Ok(0);
        }

        let assignments = columns
            .iter()
            .map(|(column, _)| format!("{column} = :{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE events SET {} WHERE id = :id", assignments);

        let names: Vec<String> = columns.iter().map(|(column, _)| format!(":{column}")).collect();
        let mut params: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .zip(&columns)
            .map(|(name, (_, value))| (name.as_str(), value.as_ref()))
            .collect();
        params.push((":id", &id));

        let changed = self
            .store
            .write(|tx| tx.execute(&sql, params.as_slice()))?;

        tracing::debug!(id, changed, "updated event");
        Ok(changed)
    }
}

/// Check the start/end/all-day trio.
///
/// All three must be present. `start` may not be later than `end`, and an
/// all-day event must span a whole number of days.
pub(crate) fn validate_times(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    all_day: Option<bool>,
) -> CalendarResult<(NaiveDateTime, NaiveDateTime, bool)> {
    let (Some(start), Some(end), Some(all_day)) = (start, end, all_day) else {
        return Err(CalendarError::MissingArgument(
            "start, end and all_day must be given together".into(),
        ));
    };

    if start > end {
        return Err(CalendarError::InvalidArgument(
            "start cannot be later than end".into(),
        ));
    }

    if all_day && !is_whole_days(start, end) {
        return Err(CalendarError::InvalidArgument(
            "all-day events must span a whole number of days".into(),
        ));
    }

    Ok((start, end, all_day))
}

/// Raw column values, decoded into an `Event` outside the row callback.
struct EventRow {
    id: i64,
    title: Option<String>,
    description: Option<String>,
    all_day: bool,
    start: String,
    end: String,
}

impl EventRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(EventRow {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            all_day: row.get(3)?,
            start: row.get(4)?,
            end: row.get(5)?,
        })
    }

    fn into_event(self) -> CalendarResult<Event> {
        Ok(Event {
            id: self.id,
            title: self.title,
            description: self.description,
            all_day: self.all_day,
            start: decode_timestamp(&self.start)?,
            end: decode_timestamp(&self.end)?,
        })
    }
}
