//! European Union summer time rule.
//!
//! Summer time runs from the last Sunday of March up to (but not including)
//! the last Sunday of October. Dates come from a trusted clock, so they are
//! assumed to be calendrically valid and are not re-checked here.

use std::fmt;

use crate::constants::SECONDS_PER_HOUR;

/// A plain calendar date as read from the process clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Offset in force on this date.
    pub fn offset(&self) -> TimeZoneOffset {
        resolve_offset(self.year, self.month, self.day)
    }

    pub fn to_naive(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<chrono::NaiveDate> for CalendarDate {
    fn from(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Central European offsets. CET outside summer time, CEST inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeZoneOffset {
    /// UTC+1
    #[default]
    Standard,
    /// UTC+2
    Summer,
}

impl TimeZoneOffset {
    pub const fn hours(self) -> i32 {
        match self {
            TimeZoneOffset::Standard => 1,
            TimeZoneOffset::Summer => 2,
        }
    }

    pub const fn minutes(self) -> i32 {
        self.hours() * 60
    }

    pub const fn seconds(self) -> i64 {
        self.hours() as i64 * SECONDS_PER_HOUR
    }

    pub const fn abbreviation(self) -> &'static str {
        match self {
            TimeZoneOffset::Standard => "CET",
            TimeZoneOffset::Summer => "CEST",
        }
    }
}

impl fmt::Display for TimeZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (UTC{:+})", self.abbreviation(), self.hours())
    }
}

/// Number of days in a month of the Gregorian calendar.
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Weekday of a date using Zeller's congruence.
///
/// Numbering is 0 = Saturday, 1 = Sunday, ..., 6 = Friday. January and
/// February are treated as months 13 and 14 of the previous year.
pub const fn day_of_week(year: i32, month: u32, day: u32) -> u32 {
    let (y, m) = if month < 3 {
        (year - 1, month as i32 + 12)
    } else {
        (year, month as i32)
    };
    let h = day as i32 + 13 * (m + 1) / 5 + y + y / 4 - y / 100 + y / 400;
    h.rem_euclid(7) as u32
}

/// Day of the month of the last Sunday in `month`.
pub const fn last_sunday_of_month(year: i32, month: u32) -> u32 {
    let last_day = days_in_month(year, month);
    let weekday = day_of_week(year, month, last_day);
    // Sunday is 1, so walking back (weekday + 6) % 7 days lands on it
    last_day - (weekday + 6) % 7
}

/// Whether European summer time is in effect on the given date.
///
/// The March changeover day counts as summer time; the October changeover
/// day does not.
pub fn is_summer_time_in_effect(year: i32, month: u32, day: u32) -> bool {
    match month {
        3 => day >= last_sunday_of_month(year, 3),
        4..=9 => true,
        10 => day < last_sunday_of_month(year, 10),
        _ => false,
    }
}

pub fn resolve_offset(year: i32, month: u32, day: u32) -> TimeZoneOffset {
    if is_summer_time_in_effect(year, month, day) {
        TimeZoneOffset::Summer
    } else {
        TimeZoneOffset::Standard
    }
}

/// Both changeover days of a year, `(march, october)`.
pub fn transitions(year: i32) -> (CalendarDate, CalendarDate) {
    (
        CalendarDate::new(year, 3, last_sunday_of_month(year, 3)),
        CalendarDate::new(year, 10, last_sunday_of_month(year, 10)),
    )
}
