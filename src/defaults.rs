//! Default values for config-splice configuration.
//!
//! This module provides centralized default values used by the configuration
//! file and the commands, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Configuration file looked up when `--config` is not given.
///
/// Can be overridden by the `CONFIG_SPLICE_CONFIG` environment variable.
pub const CONFIG_FILE: &str = ".config-splice.yaml";

/// Returns the default number of hosts processed concurrently.
pub fn default_workers() -> usize {
    10
}

/// Returns the default directory holding captured running configurations.
pub fn default_running_dir() -> PathBuf {
    PathBuf::from("running_configs")
}

/// Returns the default directory holding rendered fragments, one
/// subdirectory per host.
pub fn default_rendered_dir() -> PathBuf {
    PathBuf::from("rendered_configs")
}

/// Returns the default directory receiving merged configurations.
pub fn default_output_dir() -> PathBuf {
    PathBuf::from("merged_configs")
}
