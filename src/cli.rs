//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Config Splice - Merge rendered configuration blocks into running configurations
#[derive(Parser, Debug)]
#[command(name = "config-splice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge one category of rendered blocks into a running configuration file
    Merge(commands::merge::MergeArgs),

    /// Run every category merge for every host of the inventory
    Run(commands::run::RunArgs),

    /// List the blocks of a running configuration and their ownership
    Check(commands::check::CheckArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Merge(args) => commands::merge::execute(args),
            Commands::Run(args) => commands::run::execute(args, &self.color),
            Commands::Check(args) => commands::check::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route `log` records to stderr. `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(log_level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(log_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None).target(env_logger::Target::Stderr);
    // A second initialisation only happens in tests; the first logger wins.
    let _ = builder.try_init();
}
