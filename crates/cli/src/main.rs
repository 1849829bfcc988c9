use clap::Parser;
use tracing_subscriber::EnvFilter;

use cs_cli::cli::{self, Cli, Command, ConfigCommand};
use cs_domain::config::LoggingConfig;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    match args.command {
        Command::Next {
            schedule,
            from,
            count,
            json,
        } => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.logging);
            cli::next::run(&config, &schedule, from.as_deref(), count, json)
        }
        Command::Check { schedule, at } => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.logging);
            if !cli::check::run(&config, &schedule, &at)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Explain { schedule, json } => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.logging);
            cli::explain::run(&config, &schedule, json)
        }
        Command::Config(ConfigCommand::Validate) => {
            let (config, config_path) = cli::load_config()?;
            init_tracing(&config.logging);
            if !cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => {
            let (config, _) = cli::load_config()?;
            cli::config::show(&config)
        }
        Command::Version => {
            println!("cronstep {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize stderr tracing. `RUST_LOG` overrides the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let fallback = if logging.filter.trim().is_empty() {
        "warn"
    } else {
        logging.filter.as_str()
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
