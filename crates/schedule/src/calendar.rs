//! Gregorian calendar decomposition of a candidate instant.

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Read-only breakdown of a [`NaiveDateTime`] into the fields a schedule
/// constrains. Built on demand for each correction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// 1..=days_in_month
    pub day: u32,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u32,
    /// Occurrence of `weekday` counted from the first of the month, 1..=5.
    pub weekday_occurrence: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub days_in_month: u32,
}

impl CalendarView {
    pub fn of(at: &NaiveDateTime) -> Self {
        let day = at.day();
        Self {
            year: at.year(),
            month: at.month(),
            day,
            weekday: at.weekday().num_days_from_sunday(),
            weekday_occurrence: weekday_occurrence(day),
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
            days_in_month: days_in_month(at.year(), at.month()),
        }
    }

    /// Day position counted backward from the end of the month (last day = 1).
    pub fn reversed_day(&self) -> u32 {
        reversed_day_index(self.day, self.days_in_month)
    }

    /// Day of month of the last occurrence of this view's weekday.
    pub fn last_weekday_occurrence(&self) -> u32 {
        let last_day_weekday = (self.weekday + self.days_in_month - self.day) % 7;
        let back = (last_day_weekday + 7 - self.weekday) % 7;
        self.days_in_month - back
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1..=12) of `year`; 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Ordinal of a weekday within its month given its day of month.
pub fn weekday_occurrence(day: u32) -> u32 {
    (day - 1) / 7 + 1
}

pub fn reversed_day_index(day: u32, days_in_month: u32) -> u32 {
    days_in_month - day + 1
}
