use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use cs_domain::config::{Config, OutputFormat, MAX_OUTPUT_COUNT};

use crate::render::format_instant;

#[derive(Debug, Serialize)]
struct NextReport<'a> {
    schedule: &'a str,
    from: DateTime<Utc>,
    occurrences: Vec<DateTime<Utc>>,
}

/// Print the next `count` occurrences of `schedule`.
///
/// An unsatisfiable schedule is an error: the answer is deterministic,
/// so there is nothing to retry.
pub fn run(
    config: &Config,
    schedule: &str,
    from: Option<&str>,
    count: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let constraints = super::resolve_schedule(config, schedule)?;
    let from = match from {
        Some(raw) => super::parse_instant(raw)?,
        None => Utc::now(),
    };
    let count = count.unwrap_or(config.output.count);
    if count == 0 || count > MAX_OUTPUT_COUNT {
        anyhow::bail!("--count must be in 1..={MAX_OUTPUT_COUNT}");
    }

    let occurrences = cs_schedule::upcoming(from, &constraints, count)
        .with_context(|| format!("schedule '{schedule}' has no occurrence at or after {from}"))?;
    tracing::debug!(schedule, found = occurrences.len(), "computed occurrences");

    if json || config.output.format == OutputFormat::Json {
        let report = NextReport {
            schedule,
            from,
            occurrences,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for t in &occurrences {
            println!("{}", format_instant(t, config.output.timestamp_format));
        }
    }
    Ok(())
}
