//! Integration tests for the application operations (ops module).
//!
//! These run the public operations end to end against both store
//! implementations.

use chrono::NaiveDate;
use moodlog::db::SqliteStore;
use moodlog::entries::{build_views, merge_saved};
use moodlog::errors::AppError;
use moodlog::ops;
use moodlog::{DateRange, EntryInput, MemoryStore, MoodDefinition, MoodTaxonomy, OpenRange};
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn range(start: &str, end: &str) -> DateRange {
    DateRange::parse(start, end).unwrap()
}

fn pdf_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn test_save_update_and_export_scenario() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = SqliteStore::open(&temp_dir.path().join("moodlog.db")).expect("open store");
    let day = date("2024-03-01");
    let march_first = range("2024-03-01", "2024-03-01");

    ops::upsert_entry(&store, &EntryInput::new(day, "happy", "😊", None)).unwrap();
    let listed = ops::list_entries(&store, &march_first).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].emoji, "😊");
    assert!(listed[0].note.is_none());
    let first_id = listed[0].id;

    ops::upsert_entry(&store, &EntryInput::new(day, "sad", "😢", Some("rough day"))).unwrap();
    let listed = ops::list_entries(&store, &march_first).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, first_id);
    assert_eq!(listed[0].mood_value, "sad");
    assert_eq!(listed[0].note.as_deref(), Some("rough day"));

    let document = ops::export_range(&store, &march_first).unwrap();
    assert_eq!(document.content_type, "application/pdf");
    assert!(document.bytes.starts_with(b"%PDF-"));
    assert!(pdf_text(&document.bytes).contains("rough day"));

    let april = ops::export_range(&store, &range("2024-04-01", "2024-04-30")).unwrap();
    assert!(april.bytes.starts_with(b"%PDF-"));
    assert!(pdf_text(&april.bytes).contains("No entries recorded for this period."));
}

#[test]
fn test_merge_matches_reload() {
    let store = MemoryStore::new();
    let window = range("2024-03-01", "2024-03-10");
    for (day, mood) in [("2024-03-02", "happy"), ("2024-03-05", "meh"), ("2024-03-09", "sad")] {
        ops::upsert_entry(&store, &EntryInput::new(date(day), mood, "x", None)).unwrap();
    }
    let loaded = ops::list_entries(&store, &window).unwrap();

    // Overwrite an existing day and add a new one.
    for (day, mood) in [("2024-03-05", "angry"), ("2024-03-01", "tired")] {
        let previous = ops::list_entries(&store, &window).unwrap();
        let saved = ops::upsert_entry(&store, &EntryInput::new(date(day), mood, "y", None)).unwrap();
        let merged = merge_saved(&previous, &saved);
        let reloaded = ops::list_entries(&store, &window).unwrap();
        assert_eq!(build_views(&merged), build_views(&reloaded));
    }

    assert_eq!(loaded.len(), 3);
    assert_eq!(ops::list_entries(&store, &window).unwrap().len(), 4);
}

#[test]
fn test_taxonomy_fallback_and_replacement() {
    let store = MemoryStore::new();
    assert_eq!(ops::get_mood_config(&store).unwrap(), ops::get_mood_defaults());

    let custom = MoodTaxonomy::new(vec![
        MoodDefinition::new("calm", "😌", "Calm", Some("#0ea5e9")),
        MoodDefinition::new("wired", "⚡", "Wired", None),
    ]);
    ops::set_mood_config(&store, &custom).unwrap();
    assert_eq!(ops::get_mood_config(&store).unwrap(), custom);
    assert_eq!(ops::get_mood_defaults(), MoodTaxonomy::defaults());
}

#[test]
fn test_invalid_taxonomy_is_rejected_without_writing() {
    let store = MemoryStore::new();
    let duplicate = MoodTaxonomy::new(vec![
        MoodDefinition::new("calm", "😌", "Calm", None),
        MoodDefinition::new("calm", "🧘", "Zen", None),
    ]);

    assert!(matches!(
        ops::set_mood_config(&store, &duplicate),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        ops::set_mood_config(&store, &MoodTaxonomy::new(vec![])),
        Err(AppError::Validation(_))
    ));
    assert_eq!(ops::get_mood_config(&store).unwrap(), MoodTaxonomy::defaults());
}

#[test]
fn test_unavailable_store_is_not_mistaken_for_defaults() {
    let store = MemoryStore::new();
    store.set_unavailable(true);

    let err = ops::get_mood_config(&store).unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable(_)));

    let err = ops::list_entries(&store, &range("2024-03-01", "2024-03-31")).unwrap_err();
    assert!(err.is_transient());
}

#[test]
fn test_historical_mood_renders_with_neutral_color() {
    let store = MemoryStore::new();
    let day = date("2024-03-01");
    ops::upsert_entry(&store, &EntryInput::new(day, "happy", "😀", None)).unwrap();
    ops::set_mood_config(
        &store,
        &MoodTaxonomy::new(vec![MoodDefinition::new("calm", "😌", "Calm", Some("#0ea5e9"))]),
    )
    .unwrap();

    let document = ops::export_range(&store, &range("2024-03-01", "2024-03-31")).unwrap();
    let text = pdf_text(&document.bytes);
    // #dddddd as a fill color
    assert!(text.contains("0.867 0.867 0.867 rg"));
    assert!(text.contains("happy"));
}

#[test]
fn test_named_color_hint_renders_default_grey() {
    let store = MemoryStore::new();
    ops::set_mood_config(
        &store,
        &MoodTaxonomy::new(vec![MoodDefinition::new("calm", "😌", "Calm", Some("teal"))]),
    )
    .unwrap();
    ops::upsert_entry(&store, &EntryInput::new(date("2024-03-01"), "calm", "😌", None)).unwrap();

    let document = ops::export_range(&store, &range("2024-03-01", "2024-03-31")).unwrap();
    let text = pdf_text(&document.bytes);
    // #999999, not the #dddddd kept for moods that are gone
    assert!(text.contains("0.600 0.600 0.600 rg"));
    assert!(!text.contains("0.867 0.867 0.867 rg"));
}

#[test]
fn test_open_ranges_against_sqlite() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = SqliteStore::open(&temp_dir.path().join("moodlog.db")).expect("open store");

    let empty = ops::export_open_range(&store, &OpenRange::all_time()).unwrap();
    assert_eq!(empty.file_name, "mood_report_start_end.pdf");
    assert!(pdf_text(&empty.bytes).contains("No entries recorded for this period."));

    for (day, note) in [("2023-12-31", "old year"), ("2024-03-01", "spring"), ("2024-08-15", "summer")] {
        ops::upsert_entry(&store, &EntryInput::new(date(day), "content", "🙂", Some(note))).unwrap();
    }

    let until = OpenRange::new(None, Some(date("2024-03-31"))).unwrap();
    let listed = ops::list_entries_open(&store, &until).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].date, date("2023-12-31"));

    let document = ops::export_open_range(&store, &OpenRange::all_time()).unwrap();
    let text = pdf_text(&document.bytes);
    assert!(text.contains("(All time) Tj"));
    for note in ["old year", "spring", "summer"] {
        assert!(text.contains(note));
    }

    let since = OpenRange::new(Some(date("2024-03-01")), None).unwrap();
    let document = ops::export_open_range(&store, &since).unwrap();
    assert_eq!(document.file_name, "mood_report_2024-03-01_end.pdf");
    assert!(pdf_text(&document.bytes).contains("(From 2024-03-01 to ...) Tj"));
    assert!(!pdf_text(&document.bytes).contains("old year"));
}

#[test]
fn test_export_is_deterministic() {
    let store = MemoryStore::new();
    for day in ["2024-03-01", "2024-03-02", "2024-03-03"] {
        ops::upsert_entry(&store, &EntryInput::new(date(day), "content", "🙂", Some("ok"))).unwrap();
    }
    let march = range("2024-03-01", "2024-03-31");

    let first = ops::export_range(&store, &march).unwrap();
    let second = ops::export_range(&store, &march).unwrap();
    assert_eq!(first.bytes, second.bytes);
    assert_eq!(first.file_name, "mood_report_2024-03-01_2024-03-31.pdf");
}

#[test]
fn test_month_calendar_uses_entries() {
    let store = MemoryStore::new();
    ops::upsert_entry(&store, &EntryInput::new(date("2024-02-29"), "happy", "😀", None)).unwrap();

    let calendar = ops::month_calendar(&store, date("2024-02-10")).unwrap();
    assert_eq!(calendar.range, range("2024-02-01", "2024-02-29"));
    assert_eq!(calendar.recorded_days(), 1);
}
