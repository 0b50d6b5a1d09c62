//! Derived views over a working set of entries.
//!
//! These are caches of the store, owned by whoever loaded them. Both functions
//! are pure: no I/O, no shared state.

use super::Entry;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A date-keyed lookup and a date-ordered list built from the same entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryViews {
    pub by_date: BTreeMap<NaiveDate, Entry>,
    pub ordered: Vec<Entry>,
}

impl EntryViews {
    /// The entry for `date`. `None` just means nothing was recorded that day.
    pub fn get(&self, date: NaiveDate) -> Option<&Entry> {
        self.by_date.get(&date)
    }

    pub fn today(&self, today: NaiveDate) -> Option<&Entry> {
        self.get(today)
    }

    /// Up to `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<&Entry> {
        self.ordered.iter().rev().take(limit).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }
}

/// Projects `entries` into the two views.
///
/// If two entries share a date, the later one in iteration order wins in both
/// views. The store never returns that, but a stale working set might.
///
/// # Examples
///
/// ```
/// use moodlog::entries::build_views;
///
/// let views = build_views(&[]);
/// assert!(views.is_empty());
/// ```
pub fn build_views(entries: &[Entry]) -> EntryViews {
    let by_date = entries.iter().fold(BTreeMap::new(), |mut map, entry| {
        map.insert(entry.date, entry.clone());
        map
    });
    let ordered = by_date.values().cloned().collect();
    EntryViews { by_date, ordered }
}

/// Folds a freshly saved entry into an already-loaded list.
///
/// Drops whatever was held for `saved.date`, appends `saved` and re-sorts by
/// date, giving the same list a reload of the range would.
pub fn merge_saved(previous: &[Entry], saved: &Entry) -> Vec<Entry> {
    let mut merged: Vec<Entry> = previous
        .iter()
        .filter(|entry| entry.date != saved.date)
        .cloned()
        .collect();
    merged.push(saved.clone());
    merged.sort_by_key(|entry| entry.date);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn entry(day: u32, mood: &str) -> Entry {
        let at = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        Entry {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            mood_value: mood.to_string(),
            emoji: "😀".to_string(),
            note: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_build_views_indexes_every_date() {
        let entries = vec![entry(3, "sad"), entry(1, "happy"), entry(2, "meh")];
        let views = build_views(&entries);

        assert_eq!(views.len(), 3);
        assert_eq!(views.by_date.len(), 3);
        let dates: Vec<u32> = views.ordered.iter().map(|e| chrono::Datelike::day(&e.date)).collect();
        assert_eq!(dates, vec![1, 2, 3]);
        assert_eq!(views.get(entries[0].date).unwrap().mood_value, "sad");
    }

    #[test]
    fn test_build_views_later_duplicate_wins() {
        let first = entry(5, "happy");
        let second = entry(5, "angry");
        let views = build_views(&[first, second.clone()]);

        assert_eq!(views.len(), 1);
        assert_eq!(views.get(second.date), Some(&second));
    }

    #[test]
    fn test_missing_date_is_none_not_error() {
        let views = build_views(&[entry(1, "happy")]);
        let other = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert!(views.get(other).is_none());
        assert!(views.today(other).is_none());
    }

    #[test]
    fn test_merge_saved_replaces_same_date() {
        let previous = vec![entry(1, "happy"), entry(2, "meh"), entry(4, "sad")];
        let mut saved = entry(2, "angry");
        saved.id = previous[1].id;

        let merged = merge_saved(&previous, &saved);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1], saved);
    }

    #[test]
    fn test_merge_saved_inserts_in_date_order() {
        let previous = vec![entry(1, "happy"), entry(4, "sad")];
        let saved = entry(3, "tired");

        let merged = merge_saved(&previous, &saved);
        let moods: Vec<&str> = merged.iter().map(|e| e.mood_value.as_str()).collect();
        assert_eq!(moods, vec!["happy", "tired", "sad"]);
    }

    #[test]
    fn test_merge_into_empty() {
        let saved = entry(9, "content");
        assert_eq!(merge_saved(&[], &saved), vec![saved]);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let views = build_views(&[entry(1, "a"), entry(2, "b"), entry(3, "c")]);
        let recent: Vec<&str> = views.recent(2).iter().map(|e| e.mood_value.as_str()).collect();
        assert_eq!(recent, vec!["c", "b"]);
        assert_eq!(views.recent(10).len(), 3);
    }
}
