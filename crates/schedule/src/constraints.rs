//! The immutable constraint aggregate a schedule compiles to.

use serde::Serialize;

use crate::field::{
    ConstraintSet, DayOfMonth, DayOfWeek, Hour, Minute, Month, Second, WeekdayIndex, Year,
};

/// Allowed values for every calendar field, plus the two index-direction
/// flags. Built once (see [`ScheduleConstraints::builder`] or
/// [`crate::expression::parse`]) and only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleConstraints {
    seconds: ConstraintSet<Second>,
    minutes: ConstraintSet<Minute>,
    hours: ConstraintSet<Hour>,
    days_of_month: ConstraintSet<DayOfMonth>,
    months: ConstraintSet<Month>,
    days_of_week: ConstraintSet<DayOfWeek>,
    weekday_indexes: ConstraintSet<WeekdayIndex>,
    years: ConstraintSet<Year>,
    day_of_month_reversed: bool,
    weekday_occurrence_reversed: bool,
    /// Derived once: day-of-month allows its whole domain, so day-of-week governs.
    day_of_month_is_wildcard: bool,
}

impl ScheduleConstraints {
    pub fn builder() -> ScheduleConstraintsBuilder {
        ScheduleConstraintsBuilder::default()
    }

    pub fn seconds(&self) -> &ConstraintSet<Second> {
        &self.seconds
    }

    pub fn minutes(&self) -> &ConstraintSet<Minute> {
        &self.minutes
    }

    pub fn hours(&self) -> &ConstraintSet<Hour> {
        &self.hours
    }

    pub fn days_of_month(&self) -> &ConstraintSet<DayOfMonth> {
        &self.days_of_month
    }

    pub fn months(&self) -> &ConstraintSet<Month> {
        &self.months
    }

    pub fn days_of_week(&self) -> &ConstraintSet<DayOfWeek> {
        &self.days_of_week
    }

    pub fn weekday_indexes(&self) -> &ConstraintSet<WeekdayIndex> {
        &self.weekday_indexes
    }

    pub fn years(&self) -> &ConstraintSet<Year> {
        &self.years
    }

    /// Day-of-month values count from the last day of the month.
    pub fn day_of_month_reversed(&self) -> bool {
        self.day_of_month_reversed
    }

    /// Weekday occurrence indexes count from the end of the month.
    pub fn weekday_occurrence_reversed(&self) -> bool {
        self.weekday_occurrence_reversed
    }

    pub fn day_of_month_is_wildcard(&self) -> bool {
        self.day_of_month_is_wildcard
    }
}

impl Default for ScheduleConstraints {
    /// Every second of every day.
    fn default() -> Self {
        ScheduleConstraintsBuilder::default().build()
    }
}

/// Assembles a [`ScheduleConstraints`]; unset fields keep their full domain.
#[derive(Debug, Clone, Default)]
pub struct ScheduleConstraintsBuilder {
    seconds: ConstraintSet<Second>,
    minutes: ConstraintSet<Minute>,
    hours: ConstraintSet<Hour>,
    days_of_month: ConstraintSet<DayOfMonth>,
    months: ConstraintSet<Month>,
    days_of_week: ConstraintSet<DayOfWeek>,
    weekday_indexes: ConstraintSet<WeekdayIndex>,
    years: ConstraintSet<Year>,
    day_of_month_reversed: bool,
    weekday_occurrence_reversed: bool,
}

impl ScheduleConstraintsBuilder {
    pub fn seconds(mut self, set: ConstraintSet<Second>) -> Self {
        self.seconds = set;
        self
    }

    pub fn minutes(mut self, set: ConstraintSet<Minute>) -> Self {
        self.minutes = set;
        self
    }

    pub fn hours(mut self, set: ConstraintSet<Hour>) -> Self {
        self.hours = set;
        self
    }

    /// `reversed` makes each value count back from the month's last day.
    pub fn days_of_month(mut self, set: ConstraintSet<DayOfMonth>, reversed: bool) -> Self {
        self.days_of_month = set;
        self.day_of_month_reversed = reversed;
        self
    }

    pub fn months(mut self, set: ConstraintSet<Month>) -> Self {
        self.months = set;
        self
    }

    /// Weekday identities plus the occurrence indexes they must fall on.
    pub fn days_of_week(
        mut self,
        weekdays: ConstraintSet<DayOfWeek>,
        indexes: ConstraintSet<WeekdayIndex>,
        reversed: bool,
    ) -> Self {
        self.days_of_week = weekdays;
        self.weekday_indexes = indexes;
        self.weekday_occurrence_reversed = reversed;
        self
    }

    pub fn years(mut self, set: ConstraintSet<Year>) -> Self {
        self.years = set;
        self
    }

    pub fn build(self) -> ScheduleConstraints {
        ScheduleConstraints {
            day_of_month_is_wildcard: self.days_of_month.is_full(),
            seconds: self.seconds,
            minutes: self.minutes,
            hours: self.hours,
            days_of_month: self.days_of_month,
            months: self.months,
            days_of_week: self.days_of_week,
            weekday_indexes: self.weekday_indexes,
            years: self.years,
            day_of_month_reversed: self.day_of_month_reversed,
            weekday_occurrence_reversed: self.weekday_occurrence_reversed,
        }
    }
}
