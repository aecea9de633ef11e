//! # Error Suggestions
//!
//! Helpers that turn common failures into messages telling the user what went
//! wrong AND how to fix it.
//!
//! ```rust,ignore
//! use config_splice::suggestions;
//!
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

/// Generate an error for when the configuration file is not found.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a .config-splice.yaml file next to your running_configs directory\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set CONFIG_SPLICE_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for a run that selected no hosts.
pub fn no_hosts(running_dir: &Path, patterns: &[String]) -> anyhow::Error {
    let filter = if patterns.is_empty() {
        String::new()
    } else {
        format!(" matching {}", patterns.join(", "))
    };
    anyhow::anyhow!(
        "No hosts to process{filter}\n\n\
         hint: List hosts under 'hosts:' in the configuration file\n\
         hint: Or capture running configurations as {dir}/<host>_config",
        dir = running_dir.display()
    )
}

/// Generate an error for a merge input file that cannot be read.
pub fn unreadable_input(kind: &str, path: &Path, error: &std::io::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "Cannot read {kind} file: {path}\n\
         error: {error}\n\n\
         hint: Check the path, or pass '-' to read the {kind} configuration from stdin",
        path = path.display()
    )
}
