//! SQLite storage layer for the login accounting log.
//!
//! Provides persistence for session records using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send`
//! but not `Sync`: an instance can be moved between threads but not shared
//! without external synchronization. The accounting commands are
//! short-lived single-threaded processes, so no pooling is provided.
//!
//! # Schema
//!
//! Timestamps are stored as INTEGER microseconds since the Unix epoch,
//! the native resolution of the record model. `logout IS NULL` marks a
//! session as still open; closing a session is the only update ever made
//! to a row, and rows are never deleted (retention is an external
//! concern).
//!
//! # Delivery Order
//!
//! [`Database::with_records`] yields rows newest first (descending login
//! time). Crash reconciliation in the core depends on this ordering; it
//! is part of the storage contract, not an implementation detail.

use std::fmt::Write as _;
use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use thiserror::Error;

use wtmplog_core::{RecordKind, SessionRecord};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A row came back with an unusable shape; the message lists every
    /// field of the offending row.
    #[error("mangled entry: {detail}")]
    MalformedRecord { detail: String },
    /// Logout was requested for an id the store has never issued.
    #[error("no session record with id {0}")]
    UnknownId(i64),
    /// No open record matches the requested terminal sentinel.
    #[error("no open session record matching tty '{tty}'")]
    NoOpenRecord { tty: String },
}

const SELECT_COLUMNS: &str = "id, type, user, login, logout, tty, host, service";
const COLUMN_NAMES: [&str; 8] = [
    "id", "type", "user", "login", "logout", "tty", "host", "service",
];

/// Database connection wrapper.
///
/// See the [module documentation](self) for ordering and thread safety.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database read-write at the given path, creating the file
    /// and schema if necessary.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an existing database read-only, for report generation.
    ///
    /// A missing file is an error here, not an empty report.
    pub fn open_read_only(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Idempotent, safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS sessions (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                type     INTEGER NOT NULL,
                user     TEXT NOT NULL,
                login    INTEGER NOT NULL,
                logout   INTEGER,
                tty      TEXT,
                host     TEXT,
                service  TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_login ON sessions(login);
            CREATE INDEX IF NOT EXISTS idx_sessions_open_tty
                ON sessions(tty) WHERE logout IS NULL;
            ",
        )?;
        Ok(())
    }

    /// Creates a new open session record and returns its id.
    pub fn login(
        &self,
        kind: RecordKind,
        user: &str,
        login_time: i64,
        tty: &str,
        host: &str,
        service: &str,
    ) -> Result<i64, DbError> {
        self.conn.execute(
            "
            INSERT INTO sessions (type, user, login, logout, tty, host, service)
            VALUES (?, ?, ?, NULL, ?, ?, ?)
            ",
            params![kind.code(), user, login_time, tty, host, service],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, user, tty, "session record created");
        Ok(id)
    }

    /// Stamps the logout time onto an existing record.
    pub fn logout(&self, id: i64, logout_time: i64) -> Result<(), DbError> {
        let updated = self.conn.execute(
            "UPDATE sessions SET logout = ? WHERE id = ?",
            params![logout_time, id],
        )?;
        if updated == 0 {
            return Err(DbError::UnknownId(id));
        }
        tracing::debug!(id, "session record closed");
        Ok(())
    }

    /// Returns the id of the most recent open record whose terminal field
    /// matches `tty`, used to find the current boot session at shutdown.
    pub fn open_record_id(&self, tty: &str) -> Result<i64, DbError> {
        self.conn
            .query_row(
                "
                SELECT id FROM sessions
                WHERE tty = ? AND logout IS NULL
                ORDER BY login DESC, id DESC
                LIMIT 1
                ",
                [tty],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| DbError::NoOpenRecord {
                tty: tty.to_string(),
            })
    }

    /// Runs `f` over a lazy, newest-first scan of all session records.
    ///
    /// One row is mapped at a time; the full log is never collected. The
    /// iterator is finite, single-pass and not restartable.
    pub fn with_records<T>(&self, f: impl FnOnce(Records<'_>) -> T) -> Result<T, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM sessions ORDER BY login DESC, id DESC"
        ))?;
        let rows = stmt.query([])?;
        Ok(f(Records { rows }))
    }
}

/// Lazy record stream handed to [`Database::with_records`] callbacks.
pub struct Records<'stmt> {
    rows: rusqlite::Rows<'stmt>,
}

impl Iterator for Records<'_> {
    type Item = Result<SessionRecord, DbError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next() {
            Ok(Some(row)) => Some(record_from_row(row)),
            Ok(None) => None,
            Err(err) => Some(Err(err.into())),
        }
    }
}

fn record_from_row(row: &Row<'_>) -> Result<SessionRecord, DbError> {
    let id = require_integer(row, 0)?;
    let kind = RecordKind::from_code(require_integer(row, 1)?);
    let user = require_text(row, 2)?;

    let login_time = match row.get::<_, Value>(3)? {
        Value::Integer(usec) => usec,
        Value::Null => return Err(malformed(row)),
        other => integer_fallback("login", id, &other),
    };
    let logout_time = match row.get::<_, Value>(4)? {
        Value::Null => None,
        Value::Integer(usec) => Some(usec),
        other => Some(integer_fallback("logout", id, &other)),
    };

    Ok(SessionRecord {
        id,
        kind,
        user,
        login_time,
        logout_time,
        tty: optional_text(row, 5)?,
        host: optional_text(row, 6)?,
        service: optional_text(row, 7)?,
    })
}

fn require_integer(row: &Row<'_>, idx: usize) -> Result<i64, DbError> {
    match row.get::<_, Value>(idx)? {
        Value::Integer(value) => Ok(value),
        _ => Err(malformed(row)),
    }
}

fn require_text(row: &Row<'_>, idx: usize) -> Result<String, DbError> {
    match row.get::<_, Value>(idx)? {
        Value::Text(value) => Ok(value),
        _ => Err(malformed(row)),
    }
}

fn optional_text(row: &Row<'_>, idx: usize) -> Result<String, DbError> {
    match row.get::<_, Value>(idx)? {
        Value::Text(value) => Ok(value),
        Value::Null => Ok(String::new()),
        Value::Integer(value) => Ok(value.to_string()),
        Value::Real(value) => Ok(value.to_string()),
        Value::Blob(_) => Err(malformed(row)),
    }
}

/// Best-effort recovery for timestamps stored as text: a clean integer
/// parses silently, anything else is logged and falls back to zero.
fn integer_fallback(field: &str, id: i64, value: &Value) -> i64 {
    match value {
        Value::Text(text) => text.parse().unwrap_or_else(|_| {
            tracing::warn!(id, field, value = %text, "invalid numeric time entry");
            0
        }),
        other => {
            tracing::warn!(id, field, ?other, "invalid numeric time entry");
            0
        }
    }
}

fn malformed(row: &Row<'_>) -> DbError {
    let mut detail = String::new();
    for (idx, name) in COLUMN_NAMES.iter().enumerate() {
        if idx > 0 {
            detail.push(' ');
        }
        let value = row.get::<_, Value>(idx).unwrap_or(Value::Null);
        let _ = write!(detail, "{name}={}", describe(&value));
    }
    DbError::MalformedRecord { detail }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(bytes) => format!("<blob {} bytes>", bytes.len()),
    }
}
