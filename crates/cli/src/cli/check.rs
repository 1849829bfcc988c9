use cs_domain::config::Config;

use crate::render::format_instant;

/// Report whether `at` satisfies `schedule`. Returns `Ok(false)` on a miss.
pub fn run(config: &Config, schedule: &str, at: &str) -> anyhow::Result<bool> {
    let constraints = super::resolve_schedule(config, schedule)?;
    let at = super::parse_instant(at)?;
    let stamp = format_instant(&at, config.output.timestamp_format);

    if cs_schedule::matches(at, &constraints) {
        println!("{stamp} matches");
        return Ok(true);
    }

    match cs_schedule::calculate_next(at, &constraints) {
        Ok(next) => println!(
            "{stamp} does not match (next: {})",
            format_instant(&next, config.output.timestamp_format)
        ),
        Err(e) => println!("{stamp} does not match ({e})"),
    }
    Ok(false)
}
