//! The settings table: keyed JSON documents.
//!
//! The mood taxonomy is stored whole under one key, so saving it is a single
//! statement and readers never see a partial list.

use super::entries::format_timestamp;
use crate::constants::MOOD_CONFIG_KEY;
use crate::errors::{AppResult, DatabaseError};
use crate::mood::MoodTaxonomy;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// Reads the saved mood taxonomy, `Ok(None)` when none was ever saved.
///
/// # Errors
///
/// Returns an error if the query fails or the stored document is not a
/// valid taxonomy.
pub fn load_mood_config(conn: &Connection) -> AppResult<Option<MoodTaxonomy>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![MOOD_CONFIG_KEY],
            |row| row.get(0),
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    let Some(raw) = raw else {
        debug!("No mood config stored");
        return Ok(None);
    };

    let taxonomy: MoodTaxonomy = serde_json::from_str(&raw).map_err(|e| {
        DatabaseError::Corrupt(format!("Stored mood configuration is unreadable: {}", e))
    })?;
    debug!("Loaded mood config with {} moods", taxonomy.len());
    Ok(Some(taxonomy))
}

/// Replaces the saved mood taxonomy.
pub fn save_mood_config(
    conn: &Connection,
    taxonomy: &MoodTaxonomy,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let doc = serde_json::to_string(taxonomy)
        .map_err(|e| DatabaseError::Custom(format!("Failed to encode mood configuration: {}", e)))?;

    conn.execute(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
        params![MOOD_CONFIG_KEY, doc, format_timestamp(now)],
    )
    .map_err(DatabaseError::Sqlite)?;

    debug!("Stored mood config with {} moods", taxonomy.len());
    Ok(())
}
