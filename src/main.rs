//! # Config Splice CLI
//!
//! This is the binary entry point for the `config-splice` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initialising logging from the global `--log-level` flag.
//! - Executing the appropriate command based on the parsed arguments.
//!
//! The merge engine and the pipeline live in the `lib.rs` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
