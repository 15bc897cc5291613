//! Per-date availability overrides

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    /// Admin-set status of a calendar date
    CalendarStatus as "calendar status" {
        Available => "available",
        Booked => "booked",
        Blocked => "blocked",
        Tentative => "tentative",
    }
}

impl CalendarStatus {
    /// Whether the public may request a booking on a date with this status.
    ///
    /// Only `available` qualifies; `tentative` dates are held for someone.
    pub fn is_bookable(&self) -> bool {
        matches!(self, CalendarStatus::Available)
    }
}

impl Default for CalendarStatus {
    fn default() -> Self {
        CalendarStatus::Available
    }
}

/// Override for one calendar date; at most one row per date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub status: CalendarStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload keyed by `date`. Missing notes keep the stored notes.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCalendarEntry {
    pub date: NaiveDate,
    pub status: CalendarStatus,
    pub notes: Option<String>,
}

/// Partial update; `clear_notes` removes the stored notes and wins over
/// `notes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarChanges {
    pub status: Option<CalendarStatus>,
    pub notes: Option<String>,
    #[serde(default)]
    pub clear_notes: bool,
}

/// Inclusive date range; open ends are unbounded
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CalendarFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl CalendarFilter {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}
