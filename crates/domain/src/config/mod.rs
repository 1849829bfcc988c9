mod logging;
mod output;

pub use logging::*;
pub use output::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upper bound for `output.count`.
pub const MAX_OUTPUT_COUNT: usize = 1000;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Named cron expressions, e.g. `nightly = "0 0 2 * * ?"`.
    #[serde(default)]
    pub schedules: BTreeMap<String, String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity of a config validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl ConfigError {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Only checks what can be judged without parsing expressions; the
    /// CLI layers expression parsing on top.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.output.count == 0 || self.output.count > MAX_OUTPUT_COUNT {
            errors.push(ConfigError::error(
                "output.count",
                format!("count must be in 1..={MAX_OUTPUT_COUNT}"),
            ));
        }

        if self.logging.filter.trim().is_empty() {
            errors.push(ConfigError::warning(
                "logging.filter",
                "empty filter, falling back to \"warn\"",
            ));
        }

        if self.schedules.is_empty() {
            errors.push(ConfigError::warning("schedules", "no named schedules configured"));
        }

        for (name, expr) in &self.schedules {
            if name.trim().is_empty() {
                errors.push(ConfigError::error("schedules", "schedule name must not be empty"));
            }
            if expr.trim().is_empty() {
                errors.push(ConfigError::error(
                    format!("schedules.{name}"),
                    "expression must not be empty",
                ));
            }
        }

        errors
    }

    /// Resolve a CLI argument: a configured schedule name maps to its
    /// expression, anything else is returned as-is.
    pub fn resolve_schedule<'a>(&'a self, name_or_expr: &'a str) -> &'a str {
        self.schedules
            .get(name_or_expr)
            .map(String::as_str)
            .unwrap_or(name_or_expr)
    }
}
