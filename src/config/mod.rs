//! Configuration management for the moodlog application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `MOODLOG_DIR`: Path to the data directory (defaults to ~/.moodlog)
//! - `MOODLOG_DB`: Database file name inside the data directory (defaults to moodlog.db)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_DATA_SUBDIR, DEFAULT_DB_FILE, ENV_VAR_HOME, ENV_VAR_MOODLOG_DB, ENV_VAR_MOODLOG_DIR,
    REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Configuration for the moodlog application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use moodlog::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/var/lib/moodlog"),
///     db_file: "moods.db".to_string(),
/// };
/// assert_eq!(config.db_path(), PathBuf::from("/var/lib/moodlog/moods.db"));
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use moodlog::Config;
/// use std::env;
///
/// env::set_var("MOODLOG_DIR", "/custom/mood/path");
///
/// let config = Config::load().expect("Failed to load configuration");
/// assert_eq!(config.data_dir.to_str(), Some("/custom/mood/path"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the database.
    ///
    /// Loaded from `MOODLOG_DIR` with a fallback to ~/.moodlog.
    pub data_dir: PathBuf,

    /// Database file name, relative to `data_dir`.
    pub db_file: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("db_file", &REDACTED_PLACEHOLDER)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory is expanded with `shellexpand`, so `~` and `$VAR`
    /// references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if path expansion fails or the result fails
    /// [`Config::validate`].
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_MOODLOG_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let db_file = env::var(ENV_VAR_MOODLOG_DB)
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_FILE.to_string());

        let config = Config {
            data_dir: PathBuf::from(expanded_path.into_owned()),
            db_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when:
    /// - the data directory path is empty or relative
    /// - the database file name is empty or is not a plain file name
    ///
    /// # Examples
    ///
    /// ```
    /// use moodlog::Config;
    /// use std::path::PathBuf;
    ///
    /// let config = Config {
    ///     data_dir: PathBuf::from("relative/path"),
    ///     db_file: "moodlog.db".to_string(),
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if self.db_file.is_empty() {
            return Err(AppError::Config("Database file name is empty".to_string()));
        }

        let mut components = Path::new(&self.db_file).components();
        let is_plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !is_plain_name {
            return Err(AppError::Config(
                "Database file name must not contain path separators".to_string(),
            ));
        }

        Ok(())
    }

    /// Full path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}
