/*!
# moodlog

moodlog is a daily mood tracker. Each calendar day holds at most one entry: a
mood from a configurable taxonomy, a copy of its emoji, and an optional note.
Entries can be browsed by day or date range and exported as a PDF report.

## Core Features

- Record or replace the mood for a day (upsert keyed by date)
- List entries in a preset or explicit date range, open at either end
- Customize the mood taxonomy, falling back to built-in defaults
- Export a range as a PDF with a per-mood summary and an entries table

## Architecture

- `mood`: Mood definitions, the taxonomy and its resolver
- `entries`: Entry types and the pure view/merge reconciliation
- `range`: Date range presets and validation
- `store`: Persistence traits plus an in-memory implementation
- `db`: SQLite-backed store using r2d2 connection pooling
- `export`: Report model and PDF rendering
- `ops`: The application operations built on the above
- `cli`, `config`, `errors`, `constants`: Ambient plumbing

## Usage Example

```rust,no_run
use moodlog::db::SqliteStore;
use moodlog::ops;
use moodlog::range::{RangePreset, RangeSpec};
use std::path::Path;

fn main() -> moodlog::AppResult<()> {
    let store = SqliteStore::open(Path::new("/tmp/moodlog.db"))?;

    let taxonomy = ops::get_mood_config(&store)?;
    let today = moodlog::range::local_today();
    let input = ops::entry_input_for_mood(&taxonomy, today, "happy", Some("Sunny walk"))?;
    ops::upsert_entry(&store, &input)?;

    let range = RangeSpec::Preset(RangePreset::Last7).resolve(today)?;
    let document = ops::export_open_range(&store, &range)?;
    println!("{} ({} bytes)", document.file_name, document.bytes.len());
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// SQLite persistence
pub mod db;
/// Mood entries and derived views
pub mod entries;
/// Error types and utilities for error handling
pub mod errors;
/// PDF report export
pub mod export;
/// Mood taxonomy
pub mod mood;
/// Application operations
pub mod ops;
/// Date range selection
pub mod range;
/// Persistence traits
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use entries::{Entry, EntryInput, EntryViews};
pub use errors::{AppError, AppResult};
pub use mood::{MoodDefinition, MoodTaxonomy};
pub use range::{DateRange, OpenRange, RangePreset, RangeSpec};
pub use store::{ConfigStore, EntryStore, MemoryStore};
