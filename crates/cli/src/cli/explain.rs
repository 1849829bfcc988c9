use cs_domain::config::{Config, OutputFormat};

use crate::render::describe_constraints;

/// Print the constraint sets `schedule` compiles to.
pub fn run(config: &Config, schedule: &str, json: bool) -> anyhow::Result<()> {
    let constraints = super::resolve_schedule(config, schedule)?;
    if json || config.output.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&constraints)?);
    } else {
        println!("{}", describe_constraints(&constraints));
    }
    Ok(())
}
