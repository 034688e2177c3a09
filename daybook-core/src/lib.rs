//! Core of daybook: a personal calendar store.
//!
//! - `calendar::Calendar` stores events and answers overlap queries on UTC time
//! - `local::LocalCalendar` wraps it with wall-clock time in one IANA timezone
//! - `store::Store` is the SQLite layer underneath both

pub mod calendar;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod local;
pub mod store;
pub mod window;

pub use calendar::Calendar;
pub use error::{CalendarError, CalendarResult, StoreError};
pub use event::{Event, EventUpdate, NewEvent};
pub use local::LocalCalendar;
