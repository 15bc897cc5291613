//! Availability calendar model
//!
//! Derives the per-day booking state of a month from the current date and
//! the sparse set of admin overrides. Dates without an override are
//! `available`; days before today are past whatever their stored status is.
//!
//! Everything here is a pure function of its inputs. The home page widget,
//! the booking flow and the admin calendar all render the same grid.

use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CalendarRecord, CalendarStatus};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// Months are zero-indexed, so only 0..=11 exist
    #[error("month index {0} is out of range (expected 0-11)")]
    InvalidMonth(u32),

    #[error("year {0} is out of range")]
    InvalidYear(i32),
}

/// Today's date in the server's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A calendar month with a zero-indexed month number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 0 = January
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        let ym = Self { year, month };
        ym.first_day()?;
        Ok(ym)
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate, CalendarError> {
        if self.month > 11 {
            return Err(CalendarError::InvalidMonth(self.month));
        }
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
            .ok_or(CalendarError::InvalidYear(self.year))
    }

    pub fn last_day(&self) -> Result<NaiveDate, CalendarError> {
        self.next()
            .first_day()?
            .pred_opt()
            .ok_or(CalendarError::InvalidYear(self.year))
    }

    pub fn days_in_month(&self) -> Result<u32, CalendarError> {
        Ok(self.last_day()?.day())
    }

    pub fn next(&self) -> Self {
        if self.month >= 11 {
            Self {
                year: self.year + 1,
                month: 0,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 0 {
            Self {
                year: self.year - 1,
                month: 11,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month as usize).min(11)]
    }
}

/// Sparse date → status map of admin overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    entries: HashMap<NaiveDate, CalendarStatus>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CalendarRecord>,
    {
        records
            .into_iter()
            .map(|record| (record.date, record.status))
            .collect()
    }

    pub fn set(&mut self, date: NaiveDate, status: CalendarStatus) {
        self.entries.insert(date, status);
    }

    /// The stored override for `date`, if any
    pub fn get(&self, date: NaiveDate) -> Option<CalendarStatus> {
        self.entries.get(&date).copied()
    }

    /// Effective status: the override, or `available` when there is none
    pub fn status_on(&self, date: NaiveDate) -> CalendarStatus {
        self.get(date).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(NaiveDate, CalendarStatus)> for Overrides {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, CalendarStatus)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One populated cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    /// Day of month, 1-based
    pub day: u32,
    pub date: NaiveDate,
    pub is_past: bool,
    /// Stored status, reported even for past days
    pub status: CalendarStatus,
    pub is_available: bool,
}

impl DayCell {
    /// What the admin calendar shows: past wins over the stored status
    pub fn display_state(&self) -> DayState {
        if self.is_past {
            return DayState::Past;
        }
        match self.status {
            CalendarStatus::Available => DayState::Available,
            CalendarStatus::Booked => DayState::Booked,
            CalendarStatus::Blocked => DayState::Blocked,
            CalendarStatus::Tentative => DayState::Tentative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayState {
    Past,
    Available,
    Booked,
    Blocked,
    Tentative,
}

/// Describe a single date against `today` and the overrides
pub fn describe_day(date: NaiveDate, today: NaiveDate, overrides: &Overrides) -> DayCell {
    let is_past = date < today;
    let status = overrides.status_on(date);

    DayCell {
        day: date.day(),
        date,
        is_past,
        status,
        is_available: !is_past && status.is_bookable(),
    }
}

/// Build the grid for a month: `first_weekday` leading `None` cells (Sunday
/// is 0) followed by one cell per day.
pub fn month_grid(
    year: i32,
    month: u32,
    today: NaiveDate,
    overrides: &Overrides,
) -> Result<Vec<Option<DayCell>>, CalendarError> {
    let ym = YearMonth::new(year, month)?;
    let first = ym.first_day()?;
    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = ym.days_in_month()?;

    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.resize(leading, None);
    cells.extend(
        first
            .iter_days()
            .take(days as usize)
            .map(|date| Some(describe_day(date, today, overrides))),
    );

    Ok(cells)
}

/// A rendered month, ready to serialise for a calendar widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub cells: Vec<Option<DayCell>>,
}

impl MonthView {
    pub fn build(
        ym: YearMonth,
        today: NaiveDate,
        overrides: &Overrides,
    ) -> Result<Self, CalendarError> {
        Ok(Self {
            year: ym.year,
            month: ym.month,
            month_name: ym.name(),
            cells: month_grid(ym.year, ym.month, today, overrides)?,
        })
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().flatten()
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|cell| cell.is_none()).count()
    }

    pub fn available_dates(&self) -> Vec<NaiveDate> {
        self.days()
            .filter(|cell| cell.is_available)
            .map(|cell| cell.date)
            .collect()
    }
}
