use cs_domain::config::{Config, ConfigError, ConfigSeverity};

/// Every issue in the config, including named schedules that fail to parse.
pub fn issues(config: &Config) -> Vec<ConfigError> {
    let mut issues = config.validate();
    for (name, expr) in &config.schedules {
        if expr.trim().is_empty() {
            continue;
        }
        if let Err(e) = cs_schedule::parse(expr) {
            issues.push(ConfigError::error(format!("schedules.{name}"), e.to_string()));
        }
    }
    issues
}

/// Parse and validate the config, printing any issues.
///
/// Returns `true` when there are no errors (warnings are allowed).
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = issues(config);

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count, warning_count,
    );

    error_count == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let output = toml::to_string_pretty(config)?;
    print!("{output}");
    Ok(())
}
