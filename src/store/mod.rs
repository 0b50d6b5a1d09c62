//! The persistence boundary.
//!
//! The rest of the crate reaches durable state only through these two traits.
//! Every call either fully applies or has no effect; implementations must not
//! leave a half-written entry or taxonomy behind.

pub mod memory;

use crate::entries::{Entry, EntryInput};
use crate::errors::AppResult;
use crate::mood::MoodTaxonomy;
use crate::range::DateRange;
use chrono::NaiveDate;
use uuid::Uuid;

pub use memory::MemoryStore;

/// Durable storage for mood entries, keyed naturally by calendar date.
pub trait EntryStore {
    /// Creates the entry for `input.date`, or overwrites the mutable fields of
    /// the existing one while keeping its `id` and `created_at`.
    fn upsert_by_date(&self, input: &EntryInput) -> AppResult<Entry>;

    /// All entries with `start <= date <= end`, ascending by date.
    fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Entry>>;

    fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<Entry>>;

    /// The first and last recorded dates, `None` when nothing is recorded.
    fn date_span(&self) -> AppResult<Option<DateRange>>;

    /// Removes the entry; returns whether anything was deleted.
    fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

/// Durable storage for the user's mood taxonomy.
pub trait ConfigStore {
    /// The saved taxonomy, or `None` when nothing has been saved.
    fn load_mood_config(&self) -> AppResult<Option<MoodTaxonomy>>;

    /// Replaces any previously saved taxonomy.
    fn save_mood_config(&self, taxonomy: &MoodTaxonomy) -> AppResult<()>;
}
