//! # Check Command Implementation
//!
//! Lists the blocks the merge engine sees in a running configuration: for
//! every category, each block's identifier, its line span and whether it is
//! tool-managed or operator-owned. Ownership is per identifier, as in a
//! merge: every block of a managed route-map or prefix-list is listed as
//! managed. Headers the engine would reject are reported, and make the
//! command fail.
//!
//! This command is a read-only operation that does not modify any files.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use config_splice::block::{extract_blocks, Block, Terminator};
use config_splice::category::Category;
use config_splice::identifier::{resolve_identifier, Identifier};
use config_splice::output::{emoji, OutputConfig};
use config_splice::ownership::{ManagedMarker, DEFAULT_MARKER};
use config_splice::store::strip_preamble;
use config_splice::text::ConfigText;

use super::read_input;

/// List the blocks of a running configuration
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Captured running configuration (`-` for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub running: PathBuf,

    /// Only check this category
    #[arg(short = 'k', long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Token marking tool-owned blocks
    #[arg(short, long, value_name = "TOKEN", default_value = DEFAULT_MARKER)]
    pub marker: String,
}

/// One line of the listing, or the problem found with the block
fn describe_block(block: &Block, managed: &BTreeSet<Identifier>) -> std::result::Result<String, String> {
    let identifier = resolve_identifier(block).map_err(|e| e.to_string())?;
    block.check_indentation().map_err(|e| e.to_string())?;

    let owner = if managed.contains(&identifier) {
        "managed"
    } else {
        "operator"
    };
    let open_end = match block.terminator {
        Terminator::EndOfText => " (runs to end of text)",
        Terminator::NextLine => "",
    };
    Ok(format!(
        "{:<24} {:<9} lines {}-{}{}",
        identifier.as_str(),
        owner,
        block.span.start + 1,
        block.span.end,
        open_end
    ))
}

/// Identifiers the merge engine would treat as tool-managed
fn managed_identifiers(blocks: &[Block], marker: &ManagedMarker) -> BTreeSet<Identifier> {
    let resolved: Vec<(Identifier, &Block)> = blocks
        .iter()
        .filter_map(|block| resolve_identifier(block).ok().map(|id| (id, block)))
        .collect();
    marker.managed_identifiers(resolved.iter().map(|(id, block)| (id, *block)))
}

/// Execute the check command
pub fn execute(args: CheckArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let text = ConfigText::from(strip_preamble(&read_input("running", &args.running)?));
    let marker = ManagedMarker::new(args.marker);
    let categories: Vec<Category> = match args.category {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    let mut problems = 0;
    for category in categories {
        let blocks = extract_blocks(&text, category);
        let managed = managed_identifiers(&blocks, &marker);
        println!(
            "{} {} ({} block{})",
            emoji(&out, "🔍", "[SCAN]"),
            category,
            blocks.len(),
            if blocks.len() == 1 { "" } else { "s" }
        );
        for block in &blocks {
            match describe_block(block, &managed) {
                Ok(line) => println!("   {}", line),
                Err(problem) => {
                    problems += 1;
                    println!("   {} {}", emoji(&out, "❌", "[ERR]"), problem);
                }
            }
        }
    }

    if problems > 0 {
        anyhow::bail!("{} block problem(s) found", problems);
    }
    println!("{} No problems found", emoji(&out, "✅", "[OK]"));
    Ok(())
}
