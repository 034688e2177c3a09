//! Error types for daybook.

use thiserror::Error;

/// Errors that can occur in calendar operations.
///
/// `MissingArgument` is a caller-contract violation (a companion field was
/// left out), `InvalidArgument` is a value that breaks an event invariant.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CalendarError {
    pub fn is_missing_argument(&self) -> bool {
        matches!(self, CalendarError::MissingArgument(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CalendarError::InvalidArgument(_))
    }
}

impl From<rusqlite::Error> for CalendarError {
    fn from(err: rusqlite::Error) -> Self {
        CalendarError::Store(StoreError::Sqlite(err))
    }
}

/// Errors raised by the SQLite store and its schema bootstrap.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid database version: found {found}, expected {expected}")]
    InvalidVersion { found: i64, expected: i64 },

    #[error("Invalid stored timestamp: {0}")]
    Timestamp(String),

    #[error("Could not create database directory: {0}")]
    CreateDir(std::io::Error),
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
