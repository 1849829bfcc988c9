pub mod check;
pub mod config;
pub mod explain;
pub mod next;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use cs_domain::config::Config;
use cs_schedule::ScheduleConstraints;

/// cronstep: find when a cron schedule fires next.
#[derive(Debug, Parser)]
#[command(name = "cronstep", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the next occurrences of a schedule.
    Next {
        /// Named schedule from the config, or a cron expression.
        schedule: String,
        /// Reference instant (RFC 3339). Defaults to now.
        #[arg(long)]
        from: Option<String>,
        /// Number of occurrences (defaults to `output.count`).
        #[arg(long)]
        count: Option<usize>,
        /// Output JSON regardless of `output.format`.
        #[arg(long)]
        json: bool,
    },
    /// Check whether an instant matches a schedule (exit code 1 if not).
    Check {
        /// Named schedule from the config, or a cron expression.
        schedule: String,
        /// Instant to test (RFC 3339).
        at: String,
    },
    /// Show the constraint sets a schedule compiles to.
    Explain {
        /// Named schedule from the config, or a cron expression.
        schedule: String,
        /// Output JSON regardless of `output.format`.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and every named schedule, reporting issues.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `CRONSTEP_CONFIG` (or
/// `cronstep.toml` by default). Returns the parsed [`Config`] and the
/// path that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path =
        std::env::var("CRONSTEP_CONFIG").unwrap_or_else(|_| "cronstep.toml".into());
    let config = load_config_from(Path::new(&config_path))?;
    Ok((config, config_path))
}

/// Read and parse a config file; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Resolve a named schedule (or take the argument as an expression) and parse it.
pub fn resolve_schedule(config: &Config, schedule: &str) -> anyhow::Result<ScheduleConstraints> {
    let expr = config.resolve_schedule(schedule);
    cs_schedule::parse(expr).with_context(|| format!("invalid schedule '{expr}'"))
}

/// Parse an RFC 3339 instant into UTC.
pub fn parse_instant(raw: &str) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("invalid RFC 3339 timestamp '{raw}'"))?;
    Ok(parsed.with_timezone(&chrono::Utc))
}
