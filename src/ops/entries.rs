//! Entry operations: upsert, list, lookup and delete.

use super::with_read_retry;
use crate::entries::{Entry, EntryInput};
use crate::errors::{AppError, AppResult};
use crate::mood::MoodTaxonomy;
use crate::range::{DateRange, OpenRange};
use crate::store::EntryStore;
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

/// Saves the day's mood, creating or updating the entry for `input.date`.
///
/// Not retried on failure.
///
/// # Errors
///
/// - `AppError::Validation` if no mood or emoji is given
/// - `AppError::StoreUnavailable` if the store cannot be written
pub fn upsert_entry<S: EntryStore + ?Sized>(store: &S, input: &EntryInput) -> AppResult<Entry> {
    let input = input.validated()?;
    let entry = store.upsert_by_date(&input)?;
    info!("Saved {} for {} (entry {})", entry.mood_value, entry.date, entry.id);
    Ok(entry)
}

/// Entries in `range`, ascending by date. An empty list is a normal result.
pub fn list_entries<S: EntryStore + ?Sized>(store: &S, range: &DateRange) -> AppResult<Vec<Entry>> {
    let entries = with_read_retry("Listing entries", || {
        store.list_by_range(range.start, range.end)
    })?;
    debug!("{} entries in {}", entries.len(), range);
    Ok(entries)
}

/// Entries in a range that may be open at either end, ascending by date.
///
/// Open ends reach the first or last recorded day; an empty store or a
/// range past every recorded day gives an empty list.
pub fn list_entries_open<S: EntryStore + ?Sized>(
    store: &S,
    range: &OpenRange,
) -> AppResult<Vec<Entry>> {
    if let Some(closed) = range.closed() {
        return list_entries(store, &closed);
    }

    let span = with_read_retry("Reading recorded dates", || store.date_span())?;
    match span.and_then(|span| range.within(&span)) {
        Some(closed) => list_entries(store, &closed),
        None => {
            debug!("No recorded dates fall in {}", range);
            Ok(Vec::new())
        }
    }
}

/// The entry recorded on `date`, if there is one.
pub fn entry_for_date<S: EntryStore + ?Sized>(store: &S, date: NaiveDate) -> AppResult<Option<Entry>> {
    with_read_retry("Looking up entry", || store.get_by_date(date))
}

/// Deletes an entry. Deleting an unknown id is not an error; it returns
/// `false`.
pub fn delete_entry<S: EntryStore + ?Sized>(store: &S, id: Uuid) -> AppResult<bool> {
    let deleted = store.delete_by_id(id)?;
    if deleted {
        info!("Deleted entry {}", id);
    } else {
        debug!("No entry {} to delete", id);
    }
    Ok(deleted)
}

/// Builds the input for recording `mood_value` on `date`, copying the
/// mood's current emoji.
///
/// # Errors
///
/// Returns `AppError::Validation` if the taxonomy has no such mood.
pub fn entry_input_for_mood(
    taxonomy: &MoodTaxonomy,
    date: NaiveDate,
    mood_value: &str,
    note: Option<&str>,
) -> AppResult<EntryInput> {
    let mood = taxonomy.find(mood_value.trim()).ok_or_else(|| {
        let known: Vec<&str> = taxonomy.moods.iter().map(|m| m.value.as_str()).collect();
        AppError::Validation(format!(
            "Unknown mood '{}'. Choose one of: {}",
            mood_value,
            known.join(", ")
        ))
    })?;
    Ok(EntryInput::new(date, &mood.value, &mood.emoji, note))
}
