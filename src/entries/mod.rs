//! Mood entries: one observation per calendar day.
//!
//! `Entry` is what the store hands back; `EntryInput` is what callers submit.
//! The `date` is the natural key. Ids and timestamps are assigned by the store.

pub mod reconcile;

use crate::constants::{DATE_FORMAT_ISO, DATE_ISO_LEN};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use reconcile::{build_views, merge_saved, EntryViews};

/// A stored mood observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub mood_value: String,
    /// Copy of the mood's emoji at save time.
    pub emoji: String,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller-supplied part of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    pub date: NaiveDate,
    pub mood_value: String,
    pub emoji: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl EntryInput {
    pub fn new(date: NaiveDate, mood_value: &str, emoji: &str, note: Option<&str>) -> Self {
        EntryInput {
            date,
            mood_value: mood_value.to_string(),
            emoji: emoji.to_string(),
            note: note.map(str::to_string),
        }
    }

    /// Checks the input and returns a normalized copy.
    ///
    /// Mood value and emoji must be non-blank. A blank note becomes `None`.
    pub fn validated(&self) -> AppResult<EntryInput> {
        let mood_value = self.mood_value.trim();
        if mood_value.is_empty() {
            return Err(AppError::Validation("A mood must be selected".to_string()));
        }

        let emoji = self.emoji.trim();
        if emoji.is_empty() {
            return Err(AppError::Validation(format!(
                "Mood '{}' has no emoji",
                mood_value
            )));
        }

        let note = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(EntryInput {
            date: self.date,
            mood_value: mood_value.to_string(),
            emoji: emoji.to_string(),
            note,
        })
    }
}

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// # Examples
///
/// ```
/// use moodlog::entries::parse_iso_date;
///
/// assert_eq!(parse_iso_date("2024-03-01").unwrap().to_string(), "2024-03-01");
/// assert!(parse_iso_date("2024-3-1").is_err());
/// assert!(parse_iso_date("2024-02-30").is_err());
/// ```
pub fn parse_iso_date(value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    if value.len() != DATE_ISO_LEN {
        return Err(AppError::Validation(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            value
        )));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT_ISO)
        .map_err(|e| AppError::Validation(format!("Invalid date '{}': {}", value, e)))
}
