//! Table layout for the mood store.
//!
//! Two tables: `entries`, one row per calendar date, and `settings`, keyed
//! JSON documents. The layout version lives in SQLite's `user_version`
//! header field rather than in a table of its own.

use crate::errors::{AppError, AppResult, DatabaseError};
use rusqlite::Connection;
use tracing::{debug, info};

/// Layout version written by this build.
pub const SCHEMA_VERSION: i32 = 1;

// Dates are ISO strings, so text ordering is calendar ordering and
// `BETWEEN` on the column is a calendar range.
const CREATE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS entries (
        id TEXT PRIMARY KEY NOT NULL,
        date TEXT NOT NULL UNIQUE,
        mood_value TEXT NOT NULL,
        emoji TEXT NOT NULL,
        note TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);

    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

/// Creates the tables if missing and stamps the layout version.
///
/// Safe to run on every open.
///
/// # Errors
///
/// Returns `AppError::Config` when the file was written by a newer build
/// with a layout this one does not know, or a store error if the DDL fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    let found = get_schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(AppError::Config(format!(
            "Database layout version {} is newer than supported version {}",
            found, SCHEMA_VERSION
        )));
    }

    conn.execute_batch(CREATE_SQL)
        .map_err(DatabaseError::Sqlite)?;

    if found < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(DatabaseError::Sqlite)?;
        info!("Stamped database layout version {}", SCHEMA_VERSION);
    } else {
        debug!("Database layout version {} is current", found);
    }
    Ok(())
}

/// The stamped layout version; `0` for a brand-new file.
pub fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| DatabaseError::Sqlite(e).into())
}
