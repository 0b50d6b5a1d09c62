//! Constants used throughout the application.
//!
//! This module contains all constants used in moodlog, organized into logical
//! groups. Having constants centralized makes them easier to find, modify, and
//! reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "moodlog";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Record one mood per day and look back on it";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Log level for this crate when no `RUST_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
/// Log level for this crate with `--verbose`.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the data directory.
pub const ENV_VAR_MOODLOG_DIR: &str = "MOODLOG_DIR";
/// Environment variable for overriding the database file name.
pub const ENV_VAR_MOODLOG_DB: &str = "MOODLOG_DB";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for the data directory within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".moodlog";
/// Default database file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "moodlog.db";

// Validation
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// File System Parameters
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;

// Storage
/// Settings key under which the mood taxonomy document is stored.
pub const MOOD_CONFIG_KEY: &str = "mood_config";
/// Maximum number of connections held by the database pool.
pub const DB_POOL_MAX_SIZE: u32 = 4;
/// How many times a read is attempted before a transient failure is surfaced.
pub const READ_ATTEMPTS: u32 = 2;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Length of an ISO date string.
pub const DATE_ISO_LEN: usize = 10;
/// Month format accepted by the calendar command (YYYY-MM).
pub const MONTH_FORMAT: &str = "%Y-%m";
/// Window length of the "last 7 days" preset.
pub const LAST_7_DAYS: i64 = 7;
/// Window length of the "last 30 days" preset.
pub const LAST_30_DAYS: i64 = 30;

// Moods & Colors
/// Color used for a mood definition that carries no color of its own.
pub const DEFAULT_MOOD_COLOR: &str = "#999999";
/// Color used for entries whose mood no longer exists in the taxonomy.
pub const NEUTRAL_ENTRY_COLOR: &str = "#dddddd";

// Export
/// Title printed at the top of every report.
pub const REPORT_TITLE: &str = "Mood Report";
/// Content type of exported reports.
pub const REPORT_CONTENT_TYPE: &str = "application/pdf";
/// Timeframe line of a report with no bounds.
pub const ALL_TIME_LABEL: &str = "All time";
/// Stands in for an open end in a report timeframe.
pub const OPEN_BOUND_TEXT: &str = "...";
/// Text printed when a range has no entries.
pub const REPORT_EMPTY_TEXT: &str = "No entries recorded for this period.";
/// Maximum number of characters of a note printed in a report.
pub const REPORT_NOTE_MAX_CHARS: usize = 200;
/// Header row background.
pub const REPORT_HEADER_COLOR: &str = "#f3f4f6";
/// Table grid color.
pub const REPORT_GRID_COLOR: &str = "#e5e7eb";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "moodlog";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
