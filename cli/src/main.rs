//! bucket-cli: inspect staking configuration and replay scenarios.

use anyhow::Context;
use bucket_cli::{replay, Scenario};
use bucket_engine::StakingConfig;
use bucket_utils::LogFormat;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bucket-cli", about = "Bucket staking lifecycle tools")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's `log_level`.
    #[arg(long, env = "BUCKET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Defaults to the config file's `log_format`.
    #[arg(long, env = "BUCKET_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. Built-in defaults when absent.
    #[arg(long, global = true, env = "BUCKET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Configuration helpers.
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run a JSON scenario against an in-memory engine and print the report.
    #[command(name = "replay")]
    Replay {
        /// Scenario file.
        scenario: PathBuf,

        /// Pretty-print the JSON report.
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Validate a configuration file.
    Check {
        file: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StakingConfig> {
    let config = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            StakingConfig::from_toml_str(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => StakingConfig::default(),
    };
    config
        .validate()
        .context("configuration is inconsistent")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Command::Config {
            action: ConfigAction::Check { file },
        } => Some(file.as_path()),
        _ => cli.config.as_deref(),
    };
    let config = load_config(config_path)?;

    let format = match cli.log_format {
        Some(format) => format,
        None => config
            .log_format
            .parse()
            .context("invalid log_format in configuration")?,
    };
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    bucket_utils::init_logging(format, level);

    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", config.to_toml_string()?);
            }
            ConfigAction::Check { file } => {
                tracing::info!(path = %file.display(), "configuration is valid");
                println!("ok");
            }
        },
        Command::Replay { scenario, pretty } => {
            let contents = std::fs::read_to_string(&scenario)
                .with_context(|| format!("failed to read scenario {}", scenario.display()))?;
            let scenario = Scenario::from_json(&contents).context("failed to parse scenario")?;
            let report = replay(config, &scenario)?;
            let out = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{out}");
        }
    }

    Ok(())
}
