//! rebase-sim: runs a two-domain bridge scenario against in-process ledgers.

mod config;
mod scenario;

use clap::Parser;
use config::SimConfig;
use rebase_utils::LogFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rebase-sim", about = "Rebase ledger two-domain simulation")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value.
    #[arg(long, env = "REBASE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output: "human" or "json".
    #[arg(long, env = "REBASE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the scenario and print a JSON report to stdout.
    Run {
        /// Path to a TOML configuration file. Missing keys use defaults.
        #[arg(long, env = "REBASE_SIM_CONFIG")]
        config: Option<PathBuf>,

        /// Pretty-print the report.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the default configuration as TOML.
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, pretty } => {
            let mut config = match config {
                Some(path) => SimConfig::from_toml_file(&path)?,
                None => SimConfig::default(),
            };
            if let Some(level) = cli.log_level {
                config.log_level = level;
            }
            if let Some(format) = cli.log_format {
                config.log_format = format;
            }
            rebase_utils::init_logging(config.log_format, &config.log_level);
            tracing::info!(
                home_rate = config.home_base_rate,
                away_rate = config.away_base_rate,
                "starting simulation"
            );

            let report = scenario::run(&config)?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
        Command::DefaultConfig => {
            print!("{}", SimConfig::default().to_toml_string()?);
        }
    }
    Ok(())
}
