//! Report export.
//!
//! [`build_report`] joins entries against a taxonomy into a plain report
//! model; [`render`] lays that model out as a PDF. Both are pure: the same
//! entries, taxonomy and range always give byte-identical output.

pub mod pdf;

use crate::constants::{
    DEFAULT_MOOD_COLOR, NEUTRAL_ENTRY_COLOR, REPORT_CONTENT_TYPE, REPORT_NOTE_MAX_CHARS,
    REPORT_TITLE,
};
use crate::entries::Entry;
use crate::errors::AppResult;
use crate::mood::MoodTaxonomy;
use crate::range::OpenRange;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Parses `#rrggbb` or `#rgb`.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodlog::export::Rgb;
    ///
    /// let green = Rgb::from_hex("#22c55e").unwrap();
    /// assert!(green.g > green.r);
    /// assert!(Rgb::from_hex("green").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let (r, g, b) = match digits.len() {
            6 => (
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            ),
            3 => {
                let expand = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|v| v * 17);
                (expand(0)?, expand(1)?, expand(2)?)
            }
            _ => return None,
        };
        Some(Rgb {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
        })
    }

    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    /// The neutral grey used for moods the taxonomy no longer knows.
    pub fn neutral() -> Rgb {
        Rgb::from_hex(NEUTRAL_ENTRY_COLOR).unwrap_or(Rgb { r: 0.87, g: 0.87, b: 0.87 })
    }

    /// The grey used for a known mood whose color is missing or not hex,
    /// such as a named color hint.
    pub fn default_mood() -> Rgb {
        Rgb::from_hex(DEFAULT_MOOD_COLOR).unwrap_or(Rgb { r: 0.6, g: 0.6, b: 0.6 })
    }
}

/// One line of the per-mood summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    pub count: usize,
}

/// One line of the entries table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: String,
    pub label: String,
    pub color: Rgb,
    pub note: String,
}

/// Everything a report shows, already joined and ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub timeframe: String,
    pub summary: Vec<SummaryRow>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A rendered report ready to be saved or sent.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Joins `entries` against `taxonomy` for `range`.
///
/// Moods missing from the taxonomy keep their raw value as label and get the
/// neutral color; known moods without a usable hex color get the default
/// grey. The summary is ordered by count, ties in order of first appearance.
pub fn build_report(entries: &[Entry], taxonomy: &MoodTaxonomy, range: &OpenRange) -> Report {
    let palette = taxonomy.palette();

    let rows = entries
        .iter()
        .map(|entry| {
            let color = match palette.color(&entry.mood_value) {
                Some(hint) => Rgb::from_hex(hint).unwrap_or_else(Rgb::default_mood),
                None => Rgb::neutral(),
            };
            ReportRow {
                date: entry.date.to_string(),
                label: palette.label(&entry.mood_value).to_string(),
                color,
                note: entry
                    .note
                    .as_deref()
                    .unwrap_or("")
                    .chars()
                    .take(REPORT_NOTE_MAX_CHARS)
                    .collect(),
            }
        })
        .collect();

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        match counts.iter_mut().find(|(value, _)| *value == entry.mood_value) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.mood_value.as_str(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let summary = counts
        .into_iter()
        .map(|(value, count)| SummaryRow {
            label: palette.label(value).to_string(),
            count,
        })
        .collect();

    Report {
        title: REPORT_TITLE.to_string(),
        timeframe: range.timeframe(),
        summary,
        rows,
    }
}

/// Renders `entries` for `range` as a PDF document.
///
/// An empty `entries` slice still yields a valid document saying so.
pub fn render(entries: &[Entry], taxonomy: &MoodTaxonomy, range: &OpenRange) -> Vec<u8> {
    let report = build_report(entries, taxonomy, range);
    debug!(
        "Rendering report for {} with {} rows",
        range,
        report.rows.len()
    );
    pdf::render_report(&report)
}

/// Renders and wraps the result with its file name and content type.
pub fn export_document(
    entries: &[Entry],
    taxonomy: &MoodTaxonomy,
    range: &OpenRange,
) -> ExportDocument {
    ExportDocument {
        file_name: range.report_file_name(),
        content_type: REPORT_CONTENT_TYPE,
        bytes: render(entries, taxonomy, range),
    }
}

/// Writes `document` to `path` through a temporary file in the same
/// directory, so a failed write never leaves a truncated report behind.
///
/// # Errors
///
/// Returns `AppError::Io` if the directory is not writable or the final
/// rename fails.
pub fn write_document(document: &ExportDocument, path: &Path) -> AppResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&document.bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!("Wrote {} ({} bytes)", path.display(), document.bytes.len());
    Ok(())
}
