//! In-memory store used by tests and embedders that don't need durability.

use super::{ConfigStore, EntryStore};
use crate::entries::{Entry, EntryInput};
use crate::errors::{AppResult, DatabaseError};
use crate::mood::MoodTaxonomy;
use crate::range::DateRange;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<NaiveDate, Entry>,
    mood_config: Option<MoodTaxonomy>,
}

/// A `BTreeMap`-backed store. The date-ordered map gives range queries their
/// ascending order for free.
///
/// # Examples
///
/// ```
/// use moodlog::entries::EntryInput;
/// use moodlog::store::{EntryStore, MemoryStore};
/// use chrono::NaiveDate;
///
/// let store = MemoryStore::new();
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let first = store.upsert_by_date(&EntryInput::new(date, "happy", "😀", None)).unwrap();
/// let second = store.upsert_by_date(&EntryInput::new(date, "sad", "😢", None)).unwrap();
/// assert_eq!(first.id, second.id);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with a store-unavailable error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, State>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DatabaseError::Custom("memory store marked unavailable".to_string()).into());
        }
        self.state
            .lock()
            .map_err(|_| DatabaseError::Custom("memory store lock poisoned".to_string()).into())
    }
}

impl EntryStore for MemoryStore {
    fn upsert_by_date(&self, input: &EntryInput) -> AppResult<Entry> {
        let mut state = self.lock()?;
        let now = Utc::now();

        let entry = match state.entries.get(&input.date) {
            Some(existing) => Entry {
                mood_value: input.mood_value.clone(),
                emoji: input.emoji.clone(),
                note: input.note.clone(),
                updated_at: now,
                ..existing.clone()
            },
            None => Entry {
                id: Uuid::new_v4(),
                date: input.date,
                mood_value: input.mood_value.clone(),
                emoji: input.emoji.clone(),
                note: input.note.clone(),
                created_at: now,
                updated_at: now,
            },
        };

        state.entries.insert(entry.date, entry.clone());
        Ok(entry)
    }

    fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Entry>> {
        let state = self.lock()?;
        if start > end {
            return Ok(Vec::new());
        }
        Ok(state.entries.range(start..=end).map(|(_, e)| e.clone()).collect())
    }

    fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<Entry>> {
        Ok(self.lock()?.entries.get(&date).cloned())
    }

    fn date_span(&self) -> AppResult<Option<DateRange>> {
        let state = self.lock()?;
        let first = state.entries.keys().next().copied();
        let last = state.entries.keys().next_back().copied();
        Ok(match (first, last) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        })
    }

    fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.lock()?;
        let date = state
            .entries
            .values()
            .find(|e| e.id == id)
            .map(|e| e.date);
        Ok(match date {
            Some(date) => state.entries.remove(&date).is_some(),
            None => false,
        })
    }
}

impl ConfigStore for MemoryStore {
    fn load_mood_config(&self) -> AppResult<Option<MoodTaxonomy>> {
        Ok(self.lock()?.mood_config.clone())
    }

    fn save_mood_config(&self, taxonomy: &MoodTaxonomy) -> AppResult<()> {
        self.lock()?.mood_config = Some(taxonomy.clone());
        Ok(())
    }
}
