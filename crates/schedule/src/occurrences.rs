//! Successive occurrences of a schedule.

use chrono::{DateTime, Duration, Utc};

use cs_domain::Result;

use crate::constraints::ScheduleConstraints;
use crate::next::calculate_next;

/// Iterator over occurrences at or after a starting instant.
///
/// Each item after the first is searched from one second past the
/// previous result. The first failure is yielded once and ends the
/// iteration.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    constraints: &'a ScheduleConstraints,
    cursor: Option<DateTime<Utc>>,
}

pub fn occurrences(from: DateTime<Utc>, constraints: &ScheduleConstraints) -> Occurrences<'_> {
    Occurrences {
        constraints,
        cursor: Some(from),
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Result<DateTime<Utc>>;

    fn next(&mut self) -> Option<Self::Item> {
        let from = self.cursor.take()?;
        match calculate_next(from, self.constraints) {
            Ok(found) => {
                self.cursor = found.checked_add_signed(Duration::seconds(1));
                Some(Ok(found))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Collect up to `n` occurrences.
///
/// Stops early when a later search fails; only a failure of the very
/// first search is returned as an error.
pub fn upcoming(
    from: DateTime<Utc>,
    constraints: &ScheduleConstraints,
    n: usize,
) -> Result<Vec<DateTime<Utc>>> {
    let mut results = Vec::with_capacity(n);
    for item in occurrences(from, constraints).take(n) {
        match item {
            Ok(found) => results.push(found),
            Err(e) if results.is_empty() => return Err(e),
            Err(_) => break,
        }
    }
    Ok(results)
}
