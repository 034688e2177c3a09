//! SQLite-backed event store.
//!
//! Owns the connection, bootstraps and version-checks the schema, and hands
//! out scoped write transactions. Timestamps are stored as fixed-width text
//! so that string order is chronological order.

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Transaction};
use std::path::{Path, PathBuf};

use crate::constants::SCHEMA_VERSION;
use crate::error::{StoreError, StoreResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const CREATE_SCHEMA: &str = "
    CREATE TABLE version (
        version INTEGER NOT NULL
    );
    CREATE TABLE events (
        id INTEGER PRIMARY KEY,
        title TEXT,
        description TEXT,
        all_day INTEGER NOT NULL DEFAULT 0,
        start TEXT NOT NULL,
        end TEXT NOT NULL
    );
    CREATE INDEX events_start_end ON events (start, end);
";

/// A persistent (or in-memory) events database.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open the database at `path`, creating the file, its parent
    /// directories and the schema if they do not exist yet.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
        }

        let conn = Connection::open(path)?;
        Self::bootstrap(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn, None)
    }

    fn bootstrap(conn: Connection, path: Option<PathBuf>) -> StoreResult<Self> {
        let store = Store { conn, path };

        match store.schema_version()? {
            None => {
                tracing::debug!(path = ?store.path, "creating schema v{}", SCHEMA_VERSION);
                store.write(|tx| {
                    tx.execute_batch(CREATE_SCHEMA)?;
                    tx.execute("INSERT INTO version (version) VALUES (?1)", [SCHEMA_VERSION])?;
                    Ok::<_, StoreError>(())
                })?;
            }
            Some(SCHEMA_VERSION) => {}
            Some(found) => {
                return Err(StoreError::InvalidVersion {
                    found,
                    expected: SCHEMA_VERSION,
                });
            }
        }

        Ok(store)
    }

    /// Path of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The stamped schema version, or `None` if the schema was never created.
    pub fn schema_version(&self) -> StoreResult<Option<i64>> {
        let has_version_table = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'version'",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .is_some();

        if !has_version_table {
            return Ok(None);
        }

        let version: Option<i64> =
            self.conn
                .query_row("SELECT MAX(version) FROM version", [], |row| row.get(0))?;

        Ok(Some(version.unwrap_or(0)))
    }

    /// Run `body` inside a transaction.
    ///
    /// Commits when `body` returns `Ok`. On `Err` (or unwinding) the
    /// transaction is dropped, which rolls it back.
    pub fn write<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let value = body(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run a read-only `body` against the connection.
    pub fn read<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
    {
        body(&self.conn)
    }
}

/// Encode a UTC timestamp for storage.
pub fn encode_timestamp(datetime: NaiveDateTime) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Decode a stored timestamp.
pub fn decode_timestamp(value: &str) -> StoreResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_PARSE_FORMAT)
        .map_err(|e| StoreError::Timestamp(format!("'{}': {}", value, e)))
}
