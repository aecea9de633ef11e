//! # Output Configuration
//!
//! Controls how the CLI decorates its summaries: colours and status symbols
//! are used on capable terminals and replaced with plain tags elsewhere.
//!
//! The following are respected, in order:
//! - `--color=always|never|auto`
//! - `NO_COLOR` (any value) disables colours
//! - `CLICOLOR=0` disables, `CLICOLOR_FORCE=1` forces colours
//! - `TERM=dumb` disables colours
//! - otherwise the terminal capabilities reported by `console`

use std::env;

use console::style;

use crate::merge::{MergeAction, MergeReport};

/// Output configuration for controlling colors and symbols.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Build the configuration from the `--color` flag and the environment
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colours are enabled, the plain tag otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Status prefix of a host line
pub fn host_status(config: &OutputConfig, ok: bool) -> String {
    match (ok, config.use_color) {
        (true, true) => style("✅").green().to_string(),
        (false, true) => style("❌").red().to_string(),
        (true, false) => "[OK]".to_string(),
        (false, false) => "[FAIL]".to_string(),
    }
}

/// One-line description of a category merge, e.g. `bgp: replaced overlapping blocks`
pub fn describe_merge(report: &MergeReport) -> String {
    let mut line = format!("{}: {}", report.category, report.action);
    if report.stale_removed > 0 {
        line.push_str(&format!(", {} stale removed", report.stale_removed));
    }
    if report.action != MergeAction::Unchanged && !report.changed {
        line.push_str(" (no change)");
    }
    line
}
