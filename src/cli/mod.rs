//! Command-line interface definitions.
//!
//! Arguments are kept as raw strings where the domain has its own parser, so
//! bad dates and unknown presets surface as `AppError::Validation` like they
//! would from any other caller.

use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT, MONTH_FORMAT};
use crate::entries::parse_iso_date;
use crate::errors::{AppError, AppResult};
use crate::range::{local_today, RangePreset, RangeSpec};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

/// Record one mood per day and look back on it
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(
        long,
        global = true,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON],
        default_value = LOG_FORMAT_TEXT
    )]
    pub log_format: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record the mood for a day, replacing any earlier entry for that day
    Log(LogArgs),
    /// List entries in a date range
    List(ListArgs),
    /// Show the entry for a single day
    Show(ShowArgs),
    /// Delete an entry by id
    Delete(DeleteArgs),
    /// Show or replace the mood taxonomy
    Moods(MoodsArgs),
    /// Export a date range as a PDF report
    Export(ExportArgs),
    /// Show a month as a calendar grid
    Calendar(CalendarArgs),
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Day to record (YYYY-MM-DD, defaults to today)
    #[clap(short = 'd', long)]
    pub date: Option<String>,

    /// Mood value from the taxonomy
    #[clap(short = 'm', long)]
    pub mood: String,

    /// Optional free-text note
    #[clap(short = 'n', long)]
    pub note: Option<String>,
}

/// Range selection shared by `list` and `export`.
#[derive(Args, Debug, Default)]
pub struct RangeArgs {
    /// Preset range: last7, last30, this-month or all
    #[clap(short = 'r', long, conflicts_with_all = ["from", "to"])]
    pub range: Option<String>,

    /// First day of an explicit range (YYYY-MM-DD); open when omitted
    #[clap(long)]
    pub from: Option<String>,

    /// Last day of an explicit range (YYYY-MM-DD); open when omitted
    #[clap(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    /// The requested range; the last 30 days when nothing was given.
    pub fn to_spec(&self) -> AppResult<RangeSpec> {
        match (&self.range, &self.from, &self.to) {
            (Some(preset), _, _) => Ok(RangeSpec::Preset(preset.parse::<RangePreset>()?)),
            (None, None, None) => Ok(RangeSpec::Preset(RangePreset::Last30)),
            (None, from, to) => Ok(RangeSpec::Explicit {
                start: from.as_deref().map(parse_iso_date).transpose()?,
                end: to.as_deref().map(parse_iso_date).transpose()?,
            }),
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[clap(flatten)]
    pub range: RangeArgs,

    /// Print entries as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Day to show (YYYY-MM-DD, defaults to today)
    #[clap(short = 'd', long)]
    pub date: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Entry id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct MoodsArgs {
    /// Print the built-in defaults instead of the active taxonomy
    #[clap(long, conflicts_with = "set")]
    pub defaults: bool,

    /// Replace the taxonomy with the contents of a JSON file
    #[clap(long, value_name = "FILE")]
    pub set: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[clap(flatten)]
    pub range: RangeArgs,

    /// Where to write the report (defaults to mood_report_{start}_{end}.pdf)
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM, defaults to the current month)
    #[clap(long)]
    pub month: Option<String>,
}

/// Parses an optional ISO date, defaulting to today.
pub fn date_or_today(date: Option<&str>) -> AppResult<NaiveDate> {
    match date {
        Some(date) => parse_iso_date(date),
        None => Ok(local_today()),
    }
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(month: &str) -> AppResult<NaiveDate> {
    let month = month.trim();
    NaiveDate::parse_from_str(&format!("{}-01", month), &format!("{}-%d", MONTH_FORMAT))
        .map_err(|e| AppError::Validation(format!("Invalid month '{}': {}", month, e)))
}

/// Writes `value` as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns `AppError::Io` if the value cannot be encoded or written.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut out, value).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

/// Parses an entry id.
pub fn parse_entry_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id.trim())
        .map_err(|e| AppError::Validation(format!("Invalid entry id '{}': {}", id, e)))
}
