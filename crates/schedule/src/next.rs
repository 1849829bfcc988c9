//! Next-occurrence calculator.
//!
//! A candidate instant is inspected coarse-to-fine (year, month, day,
//! hour, minute, second). The first field rule that rejects the candidate
//! moves it forward and the pass restarts from the year, since fixing a
//! coarse field invalidates every finer one. The loop ends when a pass
//! makes no correction or the iteration budget runs out.

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use chrono::{SubsecRound, Utc};

use cs_domain::{Error, Exhaustion, Result};

use crate::calendar::CalendarView;
use crate::constraints::ScheduleConstraints;
use crate::field::{matches, YEAR_MAX};

/// Correction passes allowed before a schedule is declared unsatisfiable.
pub const MAX_ITERATIONS: u32 = u16::MAX as u32;

/// Outcome of one field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Matched,
    /// The field rejected the candidate; continue from this instant.
    Advance(NaiveDateTime),
    /// The candidate left the supported calendar range (carries the year).
    OutOfRange(i32),
}

/// A field rule inspects one field of the candidate.
pub type Rule = fn(&NaiveDateTime, &CalendarView, &ScheduleConstraints) -> Step;

/// Rules in evaluation order; date rules come first.
pub const RULES: [Rule; 6] = [
    check_year,
    check_month,
    check_day,
    check_hour,
    check_minute,
    check_second,
];

/// Earliest instant at or after `from` that satisfies `constraints`,
/// truncated to whole seconds.
///
/// # Errors
///
/// [`Error::Unsatisfiable`] when the budget is exhausted or the search
/// runs past the last supported year. The result is deterministic, so
/// callers should treat this as a configuration error rather than retry.
pub fn calculate_next(
    from: DateTime<Utc>,
    constraints: &ScheduleConstraints,
) -> Result<DateTime<Utc>> {
    let mut candidate = from.naive_utc();

    for _ in 0..MAX_ITERATIONS {
        match correct_once(&candidate, constraints) {
            Step::Matched => {
                let found = candidate.trunc_subsecs(0).and_utc();
                tracing::trace!(%from, %found, "next occurrence");
                return Ok(found);
            }
            Step::Advance(next) => candidate = next,
            Step::OutOfRange(year) => {
                tracing::debug!(%from, year, "next occurrence search left supported years");
                return Err(Error::Unsatisfiable(Exhaustion::YearBound(year)));
            }
        }
    }

    tracing::debug!(%from, budget = MAX_ITERATIONS, "next occurrence budget exhausted");
    Err(Error::Unsatisfiable(Exhaustion::IterationBudget(MAX_ITERATIONS)))
}

/// True when `at` (truncated to the second) passes every field rule.
pub fn matches_instant(at: DateTime<Utc>, constraints: &ScheduleConstraints) -> bool {
    let candidate = at.naive_utc().trunc_subsecs(0);
    correct_once(&candidate, constraints) == Step::Matched
}

/// Run the rules top-down and return the first correction, if any.
fn correct_once(at: &NaiveDateTime, constraints: &ScheduleConstraints) -> Step {
    let view = CalendarView::of(at);
    RULES
        .iter()
        .map(|rule| rule(at, &view, constraints))
        .find(|step| *step != Step::Matched)
        .unwrap_or(Step::Matched)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Date rules
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Disallowed year: jump to January 1 of the following year.
pub fn check_year(_at: &NaiveDateTime, view: &CalendarView, c: &ScheduleConstraints) -> Step {
    if view.year > YEAR_MAX as i32 {
        return Step::OutOfRange(view.year);
    }
    if u32::try_from(view.year).is_ok_and(|y| matches(y, c.years())) {
        return Step::Matched;
    }
    NaiveDate::from_ymd_opt(view.year + 1, 1, 1)
        .map_or(Step::OutOfRange(view.year), |date| Step::Advance(midnight(date)))
}

/// Disallowed month: jump to the first day of the following month.
pub fn check_month(at: &NaiveDateTime, view: &CalendarView, c: &ScheduleConstraints) -> Step {
    if matches(view.month, c.months()) {
        return Step::Matched;
    }
    at.date()
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .map_or(Step::OutOfRange(view.year), |date| Step::Advance(midnight(date)))
}

/// Day selection. An explicit day-of-month restriction governs on its own;
/// only when day-of-month is a wildcard does day-of-week apply.
pub fn check_day(at: &NaiveDateTime, view: &CalendarView, c: &ScheduleConstraints) -> Step {
    if c.day_of_month_is_wildcard() {
        check_day_of_week(at, view, c)
    } else {
        check_day_of_month(at, view, c)
    }
}

pub fn check_day_of_month(at: &NaiveDateTime, view: &CalendarView, c: &ScheduleConstraints) -> Step {
    let index = if c.day_of_month_reversed() {
        view.reversed_day()
    } else {
        view.day
    };
    if matches(index, c.days_of_month()) {
        Step::Matched
    } else {
        advance_days(at, view, 1)
    }
}

pub fn check_day_of_week(at: &NaiveDateTime, view: &CalendarView, c: &ScheduleConstraints) -> Step {
    if !matches(view.weekday, c.days_of_week()) {
        return advance_days(at, view, 1);
    }

    let occurrence_ok = if c.weekday_occurrence_reversed() {
        let last = view.last_weekday_occurrence();
        c.weekday_indexes()
            .iter()
            .any(|k| last.checked_sub(7 * (k - 1)) == Some(view.day))
    } else {
        matches(view.weekday_occurrence, c.weekday_indexes())
    };

    if occurrence_ok {
        Step::Matched
    } else {
        advance_days(at, view, 7)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Time-of-day rules
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Disallowed hour: move to the start of the next hour.
pub fn check_hour(at: &NaiveDateTime, view: &CalendarView, c: &ScheduleConstraints) -> Step {
    if matches(view.hour, c.hours()) {
        return Step::Matched;
    }
    let delta = Duration::hours(1)
        - Duration::minutes(i64::from(view.minute))
        - Duration::seconds(i64::from(view.second));
    shift(at, view, delta)
}

/// Disallowed minute: move to the start of the next minute.
pub fn check_minute(at: &NaiveDateTime, view: &CalendarView, c: &ScheduleConstraints) -> Step {
    if matches(view.minute, c.minutes()) {
        return Step::Matched;
    }
    let delta = Duration::minutes(1) - Duration::seconds(i64::from(view.second));
    shift(at, view, delta)
}

pub fn check_second(at: &NaiveDateTime, view: &CalendarView, c: &ScheduleConstraints) -> Step {
    if matches(view.second, c.seconds()) {
        return Step::Matched;
    }
    shift(at, view, Duration::seconds(1))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Midnight `days` days after the candidate's date.
fn advance_days(at: &NaiveDateTime, view: &CalendarView, days: u64) -> Step {
    at.date()
        .checked_add_days(Days::new(days))
        .map_or(Step::OutOfRange(view.year), |date| Step::Advance(midnight(date)))
}

fn shift(at: &NaiveDateTime, view: &CalendarView, delta: Duration) -> Step {
    at.checked_add_signed(delta)
        .map_or(Step::OutOfRange(view.year), Step::Advance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ConstraintSet;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn run(rule: Rule, candidate: NaiveDateTime, c: &ScheduleConstraints) -> Step {
        rule(&candidate, &CalendarView::of(&candidate), c)
    }

    #[test]
    fn year_rule_steps_one_year() {
        let c = ScheduleConstraints::builder()
            .years(ConstraintSet::from_values([2030]).unwrap())
            .build();
        assert_eq!(
            run(check_year, at(2021, 6, 9, 8, 7, 6), &c),
            Step::Advance(at(2022, 1, 1, 0, 0, 0))
        );
        assert_eq!(run(check_year, at(2030, 6, 9, 8, 7, 6), &c), Step::Matched);
    }

    #[test]
    fn year_rule_stops_past_supported_range() {
        let c = ScheduleConstraints::default();
        assert_eq!(run(check_year, at(2100, 1, 1, 0, 0, 0), &c), Step::OutOfRange(2100));
    }

    #[test]
    fn year_rule_walks_forward_from_before_range() {
        let c = ScheduleConstraints::default();
        assert_eq!(
            run(check_year, at(1969, 12, 31, 23, 0, 0), &c),
            Step::Advance(at(1970, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn month_rule_moves_to_first_of_next_month() {
        let c = ScheduleConstraints::builder()
            .months(ConstraintSet::from_values([6]).unwrap())
            .build();
        assert_eq!(
            run(check_month, at(2021, 1, 31, 12, 0, 0), &c),
            Step::Advance(at(2021, 2, 1, 0, 0, 0))
        );
        assert_eq!(
            run(check_month, at(2021, 12, 5, 12, 0, 0), &c),
            Step::Advance(at(2022, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn reversed_day_of_month_counts_from_end() {
        let c = ScheduleConstraints::builder()
            .days_of_month(ConstraintSet::from_values([1]).unwrap(), true)
            .build();
        assert_eq!(run(check_day, at(2024, 2, 29, 5, 0, 0), &c), Step::Matched);
        assert_eq!(
            run(check_day, at(2024, 2, 28, 5, 0, 0), &c),
            Step::Advance(at(2024, 2, 29, 0, 0, 0))
        );
    }

    #[test]
    fn day_of_month_governs_when_restricted() {
        // Day-of-week restricted to Sunday is ignored because day-of-month is explicit.
        let c = ScheduleConstraints::builder()
            .days_of_month(ConstraintSet::from_values([15]).unwrap(), false)
            .days_of_week(
                ConstraintSet::from_values([0]).unwrap(),
                ConstraintSet::full(),
                false,
            )
            .build();
        // 2021-03-15 is a Monday.
        assert_eq!(run(check_day, at(2021, 3, 15, 0, 0, 0), &c), Step::Matched);
    }

    #[test]
    fn forward_occurrence_miss_skips_a_week() {
        let c = ScheduleConstraints::builder()
            .days_of_week(
                ConstraintSet::from_values([1]).unwrap(),
                ConstraintSet::from_values([3]).unwrap(),
                false,
            )
            .build();
        // First Monday of March 2021.
        assert_eq!(
            run(check_day, at(2021, 3, 1, 9, 0, 0), &c),
            Step::Advance(at(2021, 3, 8, 0, 0, 0))
        );
        assert_eq!(run(check_day, at(2021, 3, 15, 9, 0, 0), &c), Step::Matched);
    }

    #[test]
    fn reversed_occurrence_matches_second_to_last() {
        let c = ScheduleConstraints::builder()
            .days_of_week(
                ConstraintSet::from_values([5]).unwrap(),
                ConstraintSet::from_values([2]).unwrap(),
                true,
            )
            .build();
        // May 2024 Fridays: 3, 10, 17, 24, 31.
        assert_eq!(run(check_day, at(2024, 5, 24, 0, 0, 0), &c), Step::Matched);
        assert_eq!(
            run(check_day, at(2024, 5, 17, 0, 0, 0), &c),
            Step::Advance(at(2024, 5, 24, 0, 0, 0))
        );
    }

    #[test]
    fn wrong_weekday_advances_one_day() {
        let c = ScheduleConstraints::builder()
            .days_of_week(ConstraintSet::from_values([3]).unwrap(), ConstraintSet::full(), false)
            .build();
        assert_eq!(
            run(check_day, at(2021, 3, 15, 9, 30, 0), &c),
            Step::Advance(at(2021, 3, 16, 0, 0, 0))
        );
    }

    #[test]
    fn hour_rule_zeroes_minutes_and_seconds() {
        let c = ScheduleConstraints::builder()
            .hours(ConstraintSet::from_values([0]).unwrap())
            .build();
        assert_eq!(
            run(check_hour, at(2021, 3, 15, 23, 59, 59), &c),
            Step::Advance(at(2021, 3, 16, 0, 0, 0))
        );
    }

    #[test]
    fn minute_rule_zeroes_seconds() {
        let c = ScheduleConstraints::builder()
            .minutes(ConstraintSet::from_values([30]).unwrap())
            .build();
        assert_eq!(
            run(check_minute, at(2021, 3, 15, 10, 12, 44), &c),
            Step::Advance(at(2021, 3, 15, 10, 13, 0))
        );
    }

    #[test]
    fn second_rule_steps_one_second() {
        let c = ScheduleConstraints::builder()
            .seconds(ConstraintSet::from_values([0]).unwrap())
            .build();
        assert_eq!(
            run(check_second, at(2021, 3, 15, 10, 12, 44), &c),
            Step::Advance(at(2021, 3, 15, 10, 12, 45))
        );
    }

    #[test]
    fn calculate_next_truncates_fraction() {
        let from = at(2021, 3, 15, 10, 0, 0).and_utc() + Duration::milliseconds(750);
        let got = calculate_next(from, &ScheduleConstraints::default()).unwrap();
        assert_eq!(got, at(2021, 3, 15, 10, 0, 0).and_utc());
    }
}
