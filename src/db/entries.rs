//! Entry queries.
//!
//! This module provides functions for upserting, reading, range-listing and
//! deleting mood entries. The `date` column is the natural key.

use crate::entries::{Entry, EntryInput};
use crate::constants::DATE_FORMAT_ISO;
use crate::errors::{AppResult, DatabaseError};
use crate::range::DateRange;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

const ENTRY_COLUMNS: &str = "id, date, mood_value, emoji, note, created_at, updated_at";

/// Inserts or updates the entry for `input.date`.
///
/// If an entry with the same date already exists, its mood, emoji, note and
/// `updated_at` are overwritten; `id` and `created_at` are kept. Returns the
/// entry as stored.
///
/// Callers that need all-or-nothing visibility run this inside a transaction.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_entry(conn: &Connection, input: &EntryInput, now: DateTime<Utc>) -> AppResult<Entry> {
    debug!("Upserting entry for date {}", input.date);

    let now = format_timestamp(now);
    conn.execute(
        r#"
        INSERT INTO entries (id, date, mood_value, emoji, note, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        ON CONFLICT(date) DO UPDATE SET
            mood_value = excluded.mood_value,
            emoji = excluded.emoji,
            note = excluded.note,
            updated_at = excluded.updated_at
        "#,
        params![
            Uuid::new_v4().to_string(),
            input.date.to_string(),
            input.mood_value,
            input.emoji,
            input.note,
            now
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    let entry = get_entry_by_date(conn, input.date)?.ok_or_else(|| {
        DatabaseError::NotFound(format!("Entry for {} vanished after upsert", input.date))
    })?;

    debug!("Entry upserted with id {}", entry.id);
    Ok(entry)
}

/// Retrieves an entry by date.
///
/// Returns `Ok(None)` if no entry exists for the given date.
pub fn get_entry_by_date(conn: &Connection, date: NaiveDate) -> AppResult<Option<Entry>> {
    debug!("Getting entry for date {}", date);

    conn.query_row(
        &format!("SELECT {} FROM entries WHERE date = ?1", ENTRY_COLUMNS),
        params![date.to_string()],
        row_to_entry,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Lists entries with `start <= date <= end`, ascending by date.
pub fn list_entries_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<Entry>> {
    debug!("Listing entries from {} to {}", start, end);

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM entries WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC",
            ENTRY_COLUMNS
        ))
        .map_err(DatabaseError::Sqlite)?;

    let entries = stmt
        .query_map(params![start.to_string(), end.to_string()], row_to_entry)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Found {} entries", entries.len());
    Ok(entries)
}

/// The earliest and latest recorded dates, `None` for an empty table.
pub fn recorded_date_span(conn: &Connection) -> AppResult<Option<DateRange>> {
    let (first, last): (Option<String>, Option<String>) = conn
        .query_row("SELECT MIN(date), MAX(date) FROM entries", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .map_err(DatabaseError::Sqlite)?;

    match (first, last) {
        (Some(first), Some(last)) => {
            let parse = |raw: &str| {
                NaiveDate::parse_from_str(raw, DATE_FORMAT_ISO).map_err(|e| {
                    DatabaseError::Corrupt(format!("Stored date '{}' is unreadable: {}", raw, e))
                })
            };
            let span = DateRange {
                start: parse(&first)?,
                end: parse(&last)?,
            };
            debug!("Recorded dates span {}", span);
            Ok(Some(span))
        }
        _ => Ok(None),
    }
}

/// Deletes an entry by id. Returns whether a row was removed.
pub fn delete_entry(conn: &Connection, id: Uuid) -> AppResult<bool> {
    debug!("Deleting entry {}", id);

    let rows_affected = conn
        .execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])
        .map_err(DatabaseError::Sqlite)?;

    Ok(rows_affected > 0)
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let id: String = row.get(0)?;
    let date: String = row.get(1)?;

    Ok(Entry {
        id: Uuid::parse_str(&id).map_err(|e| conversion_error(0, e))?,
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT_ISO).map_err(|e| conversion_error(1, e))?,
        mood_value: row.get(2)?,
        emoji: row.get(3)?,
        note: row.get(4)?,
        created_at: parse_timestamp(row, 5)?,
        updated_at: parse_timestamp(row, 6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rusqlite::Connection;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::create_tables(&conn).unwrap();
        conn
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_upsert_entry_insert() {
        let conn = setup_test_db();
        let input = EntryInput::new(day(1), "happy", "😀", None);

        let entry = upsert_entry(&conn, &input, t0()).unwrap();
        assert_eq!(entry.date, day(1));
        assert_eq!(entry.mood_value, "happy");
        assert_eq!(entry.emoji, "😀");
        assert!(entry.note.is_none());
        assert_eq!(entry.created_at, t0());
        assert_eq!(entry.updated_at, t0());
    }

    #[test]
    fn test_upsert_entry_update() {
        let conn = setup_test_db();
        let later = t0() + Duration::hours(3);

        let first = upsert_entry(&conn, &EntryInput::new(day(1), "happy", "😀", None), t0()).unwrap();
        let second = upsert_entry(
            &conn,
            &EntryInput::new(day(1), "sad", "😢", Some("rough day")),
            later,
        )
        .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.mood_value, "sad");
        assert_eq!(second.emoji, "😢");
        assert_eq!(second.note.as_deref(), Some("rough day"));
        assert_eq!(second.created_at, t0());
        assert_eq!(second.updated_at, later);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_upsert_clears_note() {
        let conn = setup_test_db();
        upsert_entry(&conn, &EntryInput::new(day(1), "sad", "😢", Some("x")), t0()).unwrap();
        let entry = upsert_entry(&conn, &EntryInput::new(day(1), "sad", "😢", None), t0()).unwrap();
        assert!(entry.note.is_none());
    }

    #[test]
    fn test_get_entry_by_date_not_found() {
        let conn = setup_test_db();
        assert!(get_entry_by_date(&conn, day(1)).unwrap().is_none());
    }

    #[test]
    fn test_list_entries_in_range_inclusive_and_sorted() {
        let conn = setup_test_db();
        for d in [10, 2, 31, 1, 15] {
            upsert_entry(&conn, &EntryInput::new(day(d), "meh", "😐", None), t0()).unwrap();
        }

        let dates: Vec<NaiveDate> = list_entries_in_range(&conn, day(2), day(15))
            .unwrap()
            .into_iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, vec![day(2), day(10), day(15)]);
    }

    #[test]
    fn test_list_entries_in_empty_range() {
        let conn = setup_test_db();
        upsert_entry(&conn, &EntryInput::new(day(1), "meh", "😐", None), t0()).unwrap();

        let april_start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let april_end = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        assert!(list_entries_in_range(&conn, april_start, april_end)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_recorded_date_span() {
        let conn = setup_test_db();
        assert!(recorded_date_span(&conn).unwrap().is_none());

        for d in [10, 2, 31] {
            upsert_entry(&conn, &EntryInput::new(day(d), "meh", "😐", None), t0()).unwrap();
        }
        let span = recorded_date_span(&conn).unwrap().unwrap();
        assert_eq!(span.start, day(2));
        assert_eq!(span.end, day(31));
    }

    #[test]
    fn test_delete_entry() {
        let conn = setup_test_db();
        let entry = upsert_entry(&conn, &EntryInput::new(day(1), "meh", "😐", None), t0()).unwrap();

        assert!(delete_entry(&conn, entry.id).unwrap());
        assert!(!delete_entry(&conn, entry.id).unwrap());
        assert!(!delete_entry(&conn, Uuid::new_v4()).unwrap());
    }

    #[test]
    fn test_corrupt_row_is_an_error() {
        let conn = setup_test_db();
        conn.execute(
            "INSERT INTO entries (id, date, mood_value, emoji, created_at, updated_at) \
             VALUES ('not-a-uuid', '2024-03-01', 'meh', 'x', 'bad', 'bad')",
            [],
        )
        .unwrap();

        assert!(get_entry_by_date(&conn, day(1)).is_err());
    }
}
