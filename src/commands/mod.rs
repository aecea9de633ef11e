//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `config-splice` command-line tool, one file per subcommand.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `config_splice` library.

pub mod check;
pub mod completions;
pub mod merge;
pub mod run;

use std::io::Read;
use std::path::Path;

use anyhow::Result;

use config_splice::suggestions;

/// Read a text input, `-` meaning stdin
pub(crate) fn read_input(kind: &str, path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|e| suggestions::unreadable_input(kind, path, &e))
}
