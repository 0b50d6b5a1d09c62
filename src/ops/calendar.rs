//! Month calendar projection.

use super::entries::list_entries;
use crate::entries::{build_views, Entry};
use crate::errors::AppResult;
use crate::range::DateRange;
use crate::store::EntryStore;
use chrono::{Datelike, NaiveDate};

/// One day cell of a month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub entry: Option<Entry>,
}

/// A month laid out in Monday-first weeks. Cells outside the month are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub range: DateRange,
    pub weeks: Vec<[Option<CalendarDay>; 7]>,
}

impl CalendarMonth {
    pub fn recorded_days(&self) -> usize {
        self.weeks
            .iter()
            .flatten()
            .flatten()
            .filter(|day| day.entry.is_some())
            .count()
    }
}

/// Loads the month containing `date` and places each entry on its day.
pub fn month_calendar<S: EntryStore + ?Sized>(store: &S, date: NaiveDate) -> AppResult<CalendarMonth> {
    let range = DateRange::month_of(date)?;
    let views = build_views(&list_entries(store, &range)?);

    let mut weeks = Vec::new();
    let mut week: [Option<CalendarDay>; 7] = Default::default();
    for day in range.days() {
        let column = day.weekday().num_days_from_monday() as usize;
        week[column] = Some(CalendarDay {
            date: day,
            entry: views.get(day).cloned(),
        });
        if column == 6 {
            weeks.push(std::mem::take(&mut week));
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }

    Ok(CalendarMonth { range, weeks })
}
