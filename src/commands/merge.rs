//! # Merge Command Implementation
//!
//! Merges the rendered blocks of a single category into one captured running
//! configuration. This is the engine without the pipeline around it: no
//! inventory, no other categories, no push.
//!
//! ```bash
//! config-splice merge --running r1_config --category loopbacks \
//!     --rendered rendered_configs/r1/loopbacks_final > r1_merged
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use config_splice::category::Category;
use config_splice::merge::merge_str;
use config_splice::ownership::{ManagedMarker, DEFAULT_MARKER};
use config_splice::store::strip_preamble;

use super::read_input;

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Captured running configuration (`-` for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub running: PathBuf,

    /// Category of the rendered blocks
    /// (loopbacks, sub-interfaces, prefix-lists, route-maps, bgp)
    #[arg(short = 'k', long, value_name = "CATEGORY")]
    pub category: Category,

    /// Rendered blocks of that category (`-` for stdin)
    #[arg(short = 'R', long, value_name = "FILE")]
    pub rendered: PathBuf,

    /// Token marking tool-owned blocks
    #[arg(short, long, value_name = "TOKEN", default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// Write the merged configuration here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the merge command
pub fn execute(args: MergeArgs) -> Result<()> {
    if args.running == args.rendered && args.running.as_os_str() == "-" {
        anyhow::bail!("Only one of --running and --rendered can be read from stdin");
    }

    let running = strip_preamble(&read_input("running", &args.running)?);
    let rendered = read_input("rendered", &args.rendered)?;
    let marker = ManagedMarker::new(args.marker);

    let merged = merge_str(&running, args.category, &rendered, &marker)
        .with_context(|| format!("Failed to merge {} blocks", args.category))?;

    match args.output {
        Some(path) => std::fs::write(&path, merged)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", merged),
    }
    Ok(())
}
