//! Application operations.
//!
//! Each function here is one request the surrounding application can make.
//! They validate input, talk to the store traits, and hand back plain values;
//! nothing in this layer keeps state between calls.

pub mod calendar;
pub mod entries;
pub mod export;
pub mod moods;

use crate::constants::READ_ATTEMPTS;
use crate::errors::AppResult;
use tracing::warn;

// Re-export commonly used functions
pub use calendar::{month_calendar, CalendarDay, CalendarMonth};
pub use entries::{
    delete_entry, entry_for_date, entry_input_for_mood, list_entries, list_entries_open,
    upsert_entry,
};
pub use export::{export_open_range, export_range};
pub use moods::{get_mood_config, get_mood_defaults, set_mood_config};

/// Runs a read, retrying once on a transient store failure.
///
/// Writes never go through here: an upsert that failed after reaching the
/// store could be replayed twice.
pub(crate) fn with_read_retry<T>(what: &str, mut read: impl FnMut() -> AppResult<T>) -> AppResult<T> {
    let mut attempt = 1;
    loop {
        match read() {
            Err(err) if err.is_transient() && attempt < READ_ATTEMPTS => {
                warn!("{} failed (attempt {}), retrying: {}", what, attempt, err);
                attempt += 1;
            }
            result => return result,
        }
    }
}
