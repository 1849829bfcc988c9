//! Text rendering shared by the subcommands.

use chrono::{DateTime, SecondsFormat, Utc};

use cs_domain::config::TimestampFormat;
use cs_schedule::ScheduleConstraints;

pub fn format_instant(t: &DateTime<Utc>, format: TimestampFormat) -> String {
    match format {
        TimestampFormat::Rfc3339 => t.to_rfc3339_opts(SecondsFormat::Secs, true),
        TimestampFormat::Plain => t.format("%Y-%m-%d %H:%M:%S (%a)").to_string(),
    }
}

/// One `name  values` line per field, plus the direction flags.
pub fn describe_constraints(c: &ScheduleConstraints) -> String {
    let day_of_month = if c.day_of_month_reversed() {
        format!("{} (from month end)", c.days_of_month().describe())
    } else {
        c.days_of_month().describe()
    };
    let weekday_index = if c.weekday_occurrence_reversed() {
        format!("{} (from month end)", c.weekday_indexes().describe())
    } else {
        c.weekday_indexes().describe()
    };
    let day_rule = if c.day_of_month_is_wildcard() {
        "day-of-week"
    } else {
        "day-of-month"
    };

    let rows = [
        ("second", c.seconds().describe()),
        ("minute", c.minutes().describe()),
        ("hour", c.hours().describe()),
        ("day-of-month", day_of_month),
        ("month", c.months().describe()),
        ("day-of-week", c.days_of_week().describe()),
        ("weekday-index", weekday_index),
        ("year", c.years().describe()),
        ("day rule", day_rule.to_string()),
    ];
    rows.iter()
        .map(|(name, value)| format!("{name:<14}{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
