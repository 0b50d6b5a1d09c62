//! Error handling utilities for the moodlog application.
//!
//! `AppError` is the one error type the library returns; `AppResult<T>` is
//! shorthand for `Result<T, AppError>`. Store failures arrive wrapped as
//! `StoreUnavailable` around a `DatabaseError`.
//!
//! Two outcomes are deliberately *not* errors: an empty result set (nothing
//! recorded yet) and an absent mood configuration (the built-in defaults apply).

use thiserror::Error;

/// Failures inside a store implementation.
///
/// # Examples
///
/// ```
/// use moodlog::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry for 2024-03-01".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other moodlog instances.")]
    Pool(#[from] r2d2::Error),

    /// A row that had to exist was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Stored data that cannot be decoded. Reading it again won't help.
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    /// Custom database error with detailed message.
    #[error("{0}")]
    Custom(String),
}

/// Represents all possible errors that can occur in the moodlog application.
///
/// # Examples
///
/// Creating a validation error:
/// ```
/// use moodlog::errors::AppError;
///
/// let error = AppError::Validation("mood_value must not be empty".to_string());
/// assert_eq!(format!("{}", error), "Validation error: mood_value must not be empty");
/// ```
///
/// Converting from a database error:
/// ```
/// use moodlog::errors::{AppError, DatabaseError};
///
/// let app_error: AppError = DatabaseError::Custom("disk full".to_string()).into();
/// assert!(app_error.is_transient());
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input: bad date, empty mood selection, duplicate mood values,
    /// inverted ranges. Nothing is written when this is returned.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The persistence layer could not complete the request.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DatabaseError),

}

impl DatabaseError {
    /// Whether the same request may succeed if made again.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            DatabaseError::Corrupt(_)
                | DatabaseError::Sqlite(rusqlite::Error::FromSqlConversionFailure(..))
        )
    }
}

impl AppError {
    /// Whether a read that failed with this error may be attempted again.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::StoreUnavailable(err) => err.is_transient(),
            _ => false,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
