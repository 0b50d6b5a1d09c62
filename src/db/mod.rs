//! SQLite persistence for entries and settings.
//!
//! This module provides the durable store behind the [`EntryStore`] and
//! [`ConfigStore`] traits. It uses connection pooling via r2d2 so a handle
//! can be shared freely.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Entry upsert, range and delete queries
//! - `settings`: The mood configuration document
//!
//! # Example
//!
//! ```no_run
//! use moodlog::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/moodlog.db"))?;
//! db.initialize_schema()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`EntryStore`]: crate::store::EntryStore
//! [`ConfigStore`]: crate::store::ConfigStore

pub mod entries;
pub mod schema;
pub mod settings;

use crate::constants::DB_POOL_MAX_SIZE;
use crate::entries::{Entry, EntryInput};
use crate::errors::{AppError, AppResult, DatabaseError};
use crate::mood::MoodTaxonomy;
use crate::range::DateRange;
use crate::store::{ConfigStore, EntryStore};
use chrono::{NaiveDate, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::fs::{self, Permissions};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates a SQLite database file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database file cannot be opened
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(DB_POOL_MAX_SIZE)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map_err(DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Creates all necessary tables and indexes if they don't exist.
    /// This is idempotent and safe to call multiple times.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

/// Connection customizer applied to every pooled connection.
#[derive(Debug)]
struct SqlitePragmas;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }
}

/// Ensures the data directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the provided path is not an absolute path
/// - `AppError::Io` if the directory creation fails
pub fn ensure_data_dir_exists(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            let permissions = Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(data_dir, permissions)?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}

/// [`EntryStore`] and [`ConfigStore`] backed by a [`Database`].
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens the database at `db_path` and makes sure the schema exists.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        let db = Database::open(db_path)?;
        db.initialize_schema()?;
        Ok(SqliteStore { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl EntryStore for SqliteStore {
    fn upsert_by_date(&self, input: &EntryInput) -> AppResult<Entry> {
        let mut conn = self.db.get_conn()?;
        let tx = conn.transaction().map_err(DatabaseError::Sqlite)?;
        let entry = entries::upsert_entry(&tx, input, Utc::now())?;
        tx.commit().map_err(DatabaseError::Sqlite)?;
        Ok(entry)
    }

    fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Entry>> {
        let conn = self.db.get_conn()?;
        entries::list_entries_in_range(&conn, start, end)
    }

    fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<Entry>> {
        let conn = self.db.get_conn()?;
        entries::get_entry_by_date(&conn, date)
    }

    fn date_span(&self) -> AppResult<Option<DateRange>> {
        let conn = self.db.get_conn()?;
        entries::recorded_date_span(&conn)
    }

    fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.db.get_conn()?;
        entries::delete_entry(&conn, id)
    }
}

impl ConfigStore for SqliteStore {
    fn load_mood_config(&self) -> AppResult<Option<MoodTaxonomy>> {
        let conn = self.db.get_conn()?;
        settings::load_mood_config(&conn)
    }

    fn save_mood_config(&self, taxonomy: &MoodTaxonomy) -> AppResult<()> {
        let conn = self.db.get_conn()?;
        settings::save_mood_config(&conn, taxonomy, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_database_open_and_connect() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(&temp_dir.path().join("test.db")).unwrap();
        let conn = db.get_conn().unwrap();

        let result: i32 = conn
            .query_row("SELECT 1 + 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(result, 2);
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(&temp_dir.path().join("test.db")).unwrap();

        db.initialize_schema().unwrap();
        db.initialize_schema().unwrap();
    }

    #[test]
    fn test_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let saved = {
            let store = SqliteStore::open(&path).unwrap();
            store
                .upsert_by_date(&EntryInput::new(date, "happy", "😀", None))
                .unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_by_date(date).unwrap(), Some(saved));
    }

    #[test]
    fn test_ensure_data_dir_creates_nested_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        ensure_data_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());

        #[cfg(unix)]
        {
            let mode = fs::metadata(&nested).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn test_ensure_data_dir_rejects_relative_path() {
        let err = ensure_data_dir_exists(Path::new("relative/dir")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
