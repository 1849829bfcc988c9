//! Cron expression parser.
//!
//! `sec min hour day-of-month month day-of-week [year]`, with the usual
//! `*`, `N`, `A-B`, `*/S`, `A/S`, `A-B/S` and comma lists in every field.
//! Day-of-month additionally takes `L` / `L-n`; day-of-week takes `d#n`
//! and `dL`. `?` is `*` for the two day fields.

use std::str::FromStr;

use cs_domain::{Error, Result};

use crate::constraints::ScheduleConstraints;
use crate::field::{
    ConstraintSet, CronField, DayOfMonth, DayOfWeek, Hour, Minute, Month, Second, WeekdayIndex,
    Year,
};

const MACROS: &[(&str, &str)] = &[
    ("@yearly", "0 0 0 1 1 *"),
    ("@annually", "0 0 0 1 1 *"),
    ("@monthly", "0 0 0 1 * *"),
    ("@weekly", "0 0 0 ? * 0"),
    ("@daily", "0 0 0 * * ?"),
    ("@midnight", "0 0 0 * * ?"),
    ("@hourly", "0 0 * * * ?"),
];

/// Parse a cron expression into constraints.
///
/// # Errors
///
/// [`Error::InvalidExpression`] for a bad field count or unknown macro,
/// [`Error::InvalidField`] naming the offending field otherwise.
pub fn parse(expr: &str) -> Result<ScheduleConstraints> {
    let trimmed = expr.trim();
    let expanded = if trimmed.starts_with('@') {
        let lower = trimmed.to_ascii_lowercase();
        let (_, body) = MACROS
            .iter()
            .find(|(name, _)| *name == lower)
            .ok_or_else(|| Error::InvalidExpression(format!("unknown macro '{trimmed}'")))?;
        tracing::debug!(expression = trimmed, expansion = *body, "expanded cron macro");
        *body
    } else {
        trimmed
    };

    let fields: Vec<&str> = expanded.split_whitespace().collect();
    if !(6..=7).contains(&fields.len()) {
        return Err(Error::InvalidExpression(format!(
            "expected 6 or 7 fields (second minute hour day-of-month month day-of-week [year]), got {}",
            fields.len()
        )));
    }

    let (days_of_month, dom_reversed) = parse_day_of_month(fields[3])?;
    let (weekdays, indexes, dow_reversed) = parse_day_of_week(fields[5])?;
    let years = match fields.get(6) {
        Some(field) => parse_field::<Year>(field)?,
        None => ConstraintSet::full(),
    };

    Ok(ScheduleConstraints::builder()
        .seconds(parse_field::<Second>(fields[0])?)
        .minutes(parse_field::<Minute>(fields[1])?)
        .hours(parse_field::<Hour>(fields[2])?)
        .days_of_month(days_of_month, dom_reversed)
        .months(parse_field::<Month>(fields[4])?)
        .days_of_week(weekdays, indexes, dow_reversed)
        .years(years)
        .build())
}

impl FromStr for ScheduleConstraints {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generic fields
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_field<F: CronField>(field: &str) -> Result<ConstraintSet<F>> {
    let mut values = Vec::new();
    for part in split_list::<F>(field)? {
        values.extend(parse_part::<F>(part)?);
    }
    ConstraintSet::from_values(values)
}

fn split_list<F: CronField>(field: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = field.split(',').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(Error::field(F::NAME, format!("empty list entry in '{field}'")));
    }
    Ok(parts)
}

/// One list entry: `*`, `N`, `A-B`, optionally followed by `/S`.
fn parse_part<F: CronField>(part: &str) -> Result<Vec<u32>> {
    let (base, step) = match part.split_once('/') {
        Some((base, step_s)) => {
            let step: u32 = step_s
                .parse()
                .map_err(|_| Error::field(F::NAME, format!("invalid step '{step_s}'")))?;
            let span = F::MAX - F::MIN + 1;
            if step == 0 || step > span {
                return Err(Error::field(
                    F::NAME,
                    format!("step {step} out of range 1..={span}"),
                ));
            }
            (base, Some(step))
        }
        None => (part, None),
    };

    let (start, end) = if base == "*" {
        (F::MIN, F::MAX)
    } else if let Some((start_s, end_s)) = base.split_once('-') {
        let start = parse_value::<F>(start_s)?;
        let end = parse_value::<F>(end_s)?;
        if start > end {
            return Err(Error::field(
                F::NAME,
                format!("range start {start} > end {end}"),
            ));
        }
        (start, end)
    } else {
        let value = parse_value::<F>(base)?;
        // `A/S` runs from A to the end of the domain.
        (value, if step.is_some() { F::MAX } else { value })
    };

    let values = (start..=end)
        .step_by(step.unwrap_or(1) as usize)
        .map(F::alias)
        .collect();
    Ok(values)
}

/// A single number or symbolic name, bounds-checked against the input range.
fn parse_value<F: CronField>(token: &str) -> Result<u32> {
    let value = match token.parse::<u32>() {
        Ok(n) => n,
        Err(_) => F::NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(token))
            .map(|i| F::MIN + i as u32)
            .ok_or_else(|| Error::field(F::NAME, format!("invalid value '{token}'")))?,
    };
    if value < F::MIN || value > F::MAX_INPUT {
        return Err(Error::field(
            F::NAME,
            format!("value {value} out of range {}..={}", F::MIN, F::MAX_INPUT),
        ));
    }
    Ok(value)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Day fields
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Returns the day set and whether it counts from the end of the month.
fn parse_day_of_month(field: &str) -> Result<(ConstraintSet<DayOfMonth>, bool)> {
    if field == "?" {
        return Ok((ConstraintSet::full(), false));
    }

    let mut plain = Vec::new();
    let mut from_end = Vec::new();
    for part in split_list::<DayOfMonth>(field)? {
        if part.eq_ignore_ascii_case("L") {
            from_end.push(1);
        } else if let Some(offset_s) = part
            .strip_prefix("L-")
            .or_else(|| part.strip_prefix("l-"))
        {
            let offset: u32 = offset_s.parse().map_err(|_| {
                Error::field(DayOfMonth::NAME, format!("invalid offset in '{part}'"))
            })?;
            if offset > DayOfMonth::MAX - 1 {
                return Err(Error::field(
                    DayOfMonth::NAME,
                    format!("offset {offset} out of range 0..={}", DayOfMonth::MAX - 1),
                ));
            }
            from_end.push(offset + 1);
        } else {
            plain.extend(parse_part::<DayOfMonth>(part)?);
        }
    }

    match (plain.is_empty(), from_end.is_empty()) {
        (false, false) => Err(Error::field(
            DayOfMonth::NAME,
            "cannot mix 'L' entries with day numbers",
        )),
        (true, false) => Ok((ConstraintSet::from_values(from_end)?, true)),
        _ => Ok((ConstraintSet::from_values(plain)?, false)),
    }
}

/// Returns weekdays, occurrence indexes, and whether indexes count from
/// the end of the month.
fn parse_day_of_week(
    field: &str,
) -> Result<(ConstraintSet<DayOfWeek>, ConstraintSet<WeekdayIndex>, bool)> {
    if field == "?" {
        return Ok((ConstraintSet::full(), ConstraintSet::full(), false));
    }

    let mut plain = Vec::new();
    let mut nth = Vec::new();
    let mut last = Vec::new();
    for part in split_list::<DayOfWeek>(field)? {
        if let Some((day_s, index_s)) = part.split_once('#') {
            let day = DayOfWeek::alias(parse_value::<DayOfWeek>(day_s)?);
            let index = index_s.parse::<u32>().map_err(|_| {
                Error::field(DayOfWeek::NAME, format!("invalid occurrence in '{part}'"))
            })?;
            if !(WeekdayIndex::MIN..=WeekdayIndex::MAX).contains(&index) {
                return Err(Error::field(
                    DayOfWeek::NAME,
                    format!(
                        "occurrence {index} out of range {}..={}",
                        WeekdayIndex::MIN,
                        WeekdayIndex::MAX
                    ),
                ));
            }
            nth.push((day, index));
        } else if let Some(day_s) = part.strip_suffix(['L', 'l']) {
            last.push(DayOfWeek::alias(parse_value::<DayOfWeek>(day_s)?));
        } else {
            plain.extend(parse_part::<DayOfWeek>(part)?);
        }
    }

    let kinds = [!plain.is_empty(), !nth.is_empty(), !last.is_empty()];
    if kinds.iter().filter(|k| **k).count() > 1 {
        return Err(Error::field(
            DayOfWeek::NAME,
            "cannot mix plain weekdays, '#' and 'L' entries",
        ));
    }

    if !nth.is_empty() {
        let weekdays = ConstraintSet::from_values(nth.iter().map(|(d, _)| *d))?;
        let indexes = ConstraintSet::from_values(nth.iter().map(|(_, i)| *i))?;
        Ok((weekdays, indexes, false))
    } else if !last.is_empty() {
        let weekdays = ConstraintSet::from_values(last)?;
        let indexes = ConstraintSet::from_values([1])?;
        Ok((weekdays, indexes, true))
    } else {
        Ok((ConstraintSet::from_values(plain)?, ConstraintSet::full(), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<F: CronField>(set: &ConstraintSet<F>) -> Vec<u32> {
        set.iter().collect()
    }

    #[test]
    fn parses_wildcards() {
        let c = parse("* * * * * *").unwrap();
        assert_eq!(c, ScheduleConstraints::default());
    }

    #[test]
    fn parses_lists_ranges_and_steps() {
        let c = parse("0,30 */15 9-17/4 * * ?").unwrap();
        assert_eq!(values(c.seconds()), vec![0, 30]);
        assert_eq!(values(c.minutes()), vec![0, 15, 30, 45]);
        assert_eq!(values(c.hours()), vec![9, 13, 17]);
    }

    #[test]
    fn start_with_step_runs_to_domain_end() {
        let c = parse("0 0 5/6 * * ?").unwrap();
        assert_eq!(values(c.hours()), vec![5, 11, 17, 23]);
    }

    #[test]
    fn month_and_weekday_names() {
        let c = parse("0 0 0 ? jan,Mar-MAY MON-FRI").unwrap();
        assert_eq!(values(c.months()), vec![1, 3, 4, 5]);
        assert_eq!(values(c.days_of_week()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn seven_is_sunday() {
        let c = parse("0 0 0 ? * 5-7").unwrap();
        assert_eq!(values(c.days_of_week()), vec![0, 5, 6]);
    }

    #[test]
    fn last_day_of_month() {
        let c = parse("0 0 0 L * ?").unwrap();
        assert!(c.day_of_month_reversed());
        assert_eq!(values(c.days_of_month()), vec![1]);
        assert!(!c.day_of_month_is_wildcard());

        let c = parse("0 0 0 L-2 * ?").unwrap();
        assert_eq!(values(c.days_of_month()), vec![3]);
    }

    #[test]
    fn nth_weekday() {
        let c = parse("0 0 0 ? * MON#3").unwrap();
        assert_eq!(values(c.days_of_week()), vec![1]);
        assert_eq!(values(c.weekday_indexes()), vec![3]);
        assert!(!c.weekday_occurrence_reversed());
    }

    #[test]
    fn last_weekday() {
        let c = parse("0 0 0 ? * 5L").unwrap();
        assert_eq!(values(c.days_of_week()), vec![5]);
        assert_eq!(values(c.weekday_indexes()), vec![1]);
        assert!(c.weekday_occurrence_reversed());
    }

    #[test]
    fn optional_year_field() {
        let c = parse("0 0 0 1 1 * 2030-2032").unwrap();
        assert_eq!(values(c.years()), vec![2030, 2031, 2032]);
        assert!(parse("0 0 0 1 1 *").unwrap().years().is_full());
    }

    #[test]
    fn macros_expand() {
        assert_eq!(parse("@daily").unwrap(), parse("0 0 0 * * ?").unwrap());
        assert_eq!(parse("@HOURLY").unwrap(), parse("0 0 * * * ?").unwrap());
        assert!(matches!(
            parse("@fortnightly").unwrap_err(),
            Error::InvalidExpression(_)
        ));
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let c: ScheduleConstraints = "0 0 12 * * ?".parse().unwrap();
        assert_eq!(values(c.hours()), vec![12]);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = parse("* * * * *").unwrap_err();
        assert!(err.to_string().contains("got 5"));
        assert!(parse("* * * * * * * *").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(parse("60 * * * * ?").is_err());
        assert!(parse("* 60 * * * ?").is_err());
        assert!(parse("* * 24 * * ?").is_err());
        assert!(parse("* * * 0 * ?").is_err());
        assert!(parse("* * * 32 * ?").is_err());
        assert!(parse("* * * * 13 ?").is_err());
        assert!(parse("* * * ? * 8").is_err());
        assert!(parse("* * * * * ? 1969").is_err());
        assert!(parse("* * * * * ? 2100").is_err());
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(parse("*/0 * * * * ?").is_err());
        assert!(parse("5-1 * * * * ?").is_err());
        assert!(parse("1,,2 * * * * ?").is_err());
        assert!(parse("abc * * * * ?").is_err());
        assert!(parse("* * * L-31 * ?").is_err());
        assert!(parse("* * * ? * MON#6").is_err());
        assert!(parse("* * * ? * MON#0").is_err());
    }

    #[test]
    fn rejects_mixed_day_forms() {
        let err = parse("0 0 0 L,15 * ?").unwrap_err();
        assert_eq!(
            err.to_string(),
            "day-of-month: cannot mix 'L' entries with day numbers"
        );
        assert!(parse("0 0 0 ? * MON#1,FRI").is_err());
        assert!(parse("0 0 0 ? * MON#1,5L").is_err());
    }

    #[test]
    fn field_errors_name_the_field() {
        let err = parse("0 0 25 * * ?").unwrap_err();
        assert_eq!(err.to_string(), "hour: value 25 out of range 0..=23");
    }
}
