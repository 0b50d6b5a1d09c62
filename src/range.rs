//! Date range selection.
//!
//! Turns a named preset or explicit bounds into an inclusive interval of
//! calendar dates. Either end may be left open; open ends are closed later
//! against the dates actually recorded. "Today" is the local wall-clock
//! date; no timezone conversion happens anywhere.

use crate::constants::{ALL_TIME_LABEL, LAST_30_DAYS, LAST_7_DAYS, OPEN_BOUND_TEXT};
use crate::entries::parse_iso_date;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An inclusive interval of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(AppError::Validation(format!(
                "Range start {} is after end {}",
                start, end
            )));
        }
        Ok(DateRange { start, end })
    }

    /// Parses two `YYYY-MM-DD` strings into a range.
    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        DateRange::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// The full calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> AppResult<Self> {
        let start = date.with_day(1).ok_or_else(|| {
            AppError::Validation(format!("Cannot find first day of month for {}", date))
        })?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| {
                AppError::Validation(format!("Cannot find last day of month for {}", date))
            })?;
        DateRange::new(start, end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Named ways of picking a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    Last7,
    Last30,
    ThisMonth,
    AllTime,
}

impl FromStr for RangePreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "last7" | "last-7" => Ok(RangePreset::Last7),
            "last30" | "last-30" => Ok(RangePreset::Last30),
            "this-month" | "month" => Ok(RangePreset::ThisMonth),
            "all" | "all-time" => Ok(RangePreset::AllTime),
            other => Err(AppError::Validation(format!(
                "Unknown range preset '{}': expected last7, last30, this-month or all",
                other
            ))),
        }
    }
}

/// A date interval that may be open at either end.
///
/// Open ends mean "as far as the records go". Both ends open is all time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl OpenRange {
    /// Builds an interval, rejecting `start > end` when both are given.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            DateRange::new(start, end)?;
        }
        Ok(OpenRange { start, end })
    }

    pub fn all_time() -> Self {
        OpenRange::default()
    }

    pub fn is_all_time(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// The concrete range when both ends are given.
    pub fn closed(&self) -> Option<DateRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        }
    }

    /// Closes the open ends with the first and last recorded dates in `span`.
    ///
    /// `None` when no recorded date can fall inside, e.g. a start after the
    /// last recorded day.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodlog::range::{DateRange, OpenRange};
    /// use chrono::NaiveDate;
    ///
    /// let span = DateRange::parse("2024-01-05", "2024-06-30").unwrap();
    /// let since = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    /// let range = OpenRange::new(Some(since), None).unwrap().within(&span).unwrap();
    /// assert_eq!(range.end.to_string(), "2024-06-30");
    /// assert_eq!(OpenRange::all_time().within(&span), Some(span));
    /// ```
    pub fn within(&self, span: &DateRange) -> Option<DateRange> {
        let start = self.start.unwrap_or(span.start);
        let end = self.end.unwrap_or(span.end);
        DateRange::new(start, end).ok()
    }

    /// The report timeframe line: `All time`, or `From {start} to {end}`
    /// with `...` standing in for an open end.
    pub fn timeframe(&self) -> String {
        if self.is_all_time() {
            return ALL_TIME_LABEL.to_string();
        }
        format!(
            "From {} to {}",
            bound_or(self.start, OPEN_BOUND_TEXT),
            bound_or(self.end, OPEN_BOUND_TEXT)
        )
    }

    /// `mood_report_{start}_{end}.pdf`, with `start`/`end` for open ends.
    pub fn report_file_name(&self) -> String {
        format!(
            "mood_report_{}_{}.pdf",
            bound_or(self.start, "start"),
            bound_or(self.end, "end")
        )
    }
}

impl From<DateRange> for OpenRange {
    fn from(range: DateRange) -> Self {
        OpenRange {
            start: Some(range.start),
            end: Some(range.end),
        }
    }
}

impl fmt::Display for OpenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", bound_or(self.start, ""), bound_or(self.end, ""))
    }
}

fn bound_or(bound: Option<NaiveDate>, open: &str) -> String {
    bound.map_or_else(|| open.to_string(), |date| date.to_string())
}

/// A range request: a preset or explicit bounds, either of which may be
/// left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    Preset(RangePreset),
    Explicit {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl RangeSpec {
    /// Resolves the selection against a reference date.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodlog::range::{RangePreset, RangeSpec};
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    /// let range = RangeSpec::Preset(RangePreset::Last7).resolve(today).unwrap();
    /// assert_eq!(range.start.unwrap().to_string(), "2024-03-04");
    /// assert_eq!(range.end, Some(today));
    /// assert_eq!(range.closed().unwrap().num_days(), 7);
    /// ```
    pub fn resolve(&self, today: NaiveDate) -> AppResult<OpenRange> {
        match *self {
            RangeSpec::Preset(RangePreset::Last7) => trailing_days(today, LAST_7_DAYS).map(Into::into),
            RangeSpec::Preset(RangePreset::Last30) => {
                trailing_days(today, LAST_30_DAYS).map(Into::into)
            }
            RangeSpec::Preset(RangePreset::ThisMonth) => DateRange::month_of(today).map(Into::into),
            RangeSpec::Preset(RangePreset::AllTime) => Ok(OpenRange::all_time()),
            RangeSpec::Explicit { start, end } => OpenRange::new(start, end),
        }
    }

    /// Resolves against the local date at the moment of the call.
    pub fn resolve_now(&self) -> AppResult<OpenRange> {
        self.resolve(local_today())
    }
}

/// The local wall-clock date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn trailing_days(today: NaiveDate, days: i64) -> AppResult<DateRange> {
    DateRange::new(today - Duration::days(days - 1), today)
}
