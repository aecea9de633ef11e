//! Category merge engine
//!
//! This module splices the rendered fragment of one category into a
//! configuration text. It ties the block extractor, the identifier resolver
//! and the ownership classifier together:
//!
//! - blocks whose identifier is in the desired set are *overlap* blocks; the
//!   last one in document order becomes the insertion point for the whole
//!   rendered fragment and the others are deleted;
//! - managed blocks whose identifier is not desired are *stale* and are
//!   deleted; without any overlap block the first stale block becomes the
//!   insertion point instead;
//! - with neither, the fragment is appended to the end of the configuration;
//! - every other block of the category belongs to the operator and is left
//!   untouched, as is every block of other categories.
//!
//! The engine is a pure function from `(old text, desired set)` to a new text.
//! Merging the same desired set twice yields the same text as merging once.
//!
//! ## Example
//!
//! ```
//! use config_splice::category::Category;
//! use config_splice::merge::{merge, DesiredSet};
//! use config_splice::ownership::ManagedMarker;
//! use config_splice::text::ConfigText;
//!
//! let running = ConfigText::from("interface Loopback1\n description old\n");
//! let desired = DesiredSet::from_rendered(
//!     Category::Loopbacks,
//!     "interface Loopback1\n description Managed-By-Tool\n",
//! )
//! .unwrap();
//!
//! let outcome = merge(&running, &desired, &ManagedMarker::default()).unwrap();
//! assert_eq!(
//!     outcome.text.to_string(),
//!     "interface Loopback1\n description Managed-By-Tool\n"
//! );
//! ```

mod plan;

pub use plan::{plan, Edit, MergeAction, MergePlan};

use std::collections::BTreeSet;

use log::{debug, info, warn};
use serde::Serialize;

use crate::block::extract_from_lines;
use crate::category::Category;
use crate::error::{Error, Result};
use crate::identifier::{resolve_identifier, Identifier};
use crate::ownership::ManagedMarker;
use crate::text::ConfigText;

/// The blocks of one category's rendered fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredSet {
    category: Category,
    lines: Vec<String>,
    identifiers: BTreeSet<Identifier>,
    order: Vec<Identifier>,
}

impl DesiredSet {
    /// Build the desired set from rendered text.
    ///
    /// Blank lines and bare `!` separators between blocks are dropped; any
    /// other line outside a block is rejected, as are malformed headers and
    /// more than one block for a singleton category.
    pub fn from_rendered(category: Category, rendered: &str) -> Result<Self> {
        let source: Vec<String> = rendered.lines().map(|line| line.to_string()).collect();
        let blocks = extract_from_lines(&source, category);

        let mut covered = vec![false; source.len()];
        for block in &blocks {
            for flag in &mut covered[block.span.clone()] {
                *flag = true;
            }
        }
        if let Some(stray) = source
            .iter()
            .zip(&covered)
            .find(|(line, covered)| !**covered && !is_separator(line))
            .map(|(line, _)| line)
        {
            return Err(Error::RenderedText {
                category,
                line: stray.clone(),
            });
        }

        if category.is_singleton() && blocks.len() > 1 {
            return Err(Error::RenderedText {
                category,
                line: blocks[1].header.clone(),
            });
        }

        let mut lines = Vec::new();
        let mut identifiers = BTreeSet::new();
        let mut order = Vec::new();
        for block in &blocks {
            block.check_indentation()?;
            let identifier = resolve_identifier(block)?;
            if identifiers.insert(identifier.clone()) {
                order.push(identifier);
            }
            lines.extend(block.lines().cloned());
        }

        Ok(Self {
            category,
            lines,
            identifiers,
            order,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// The normalized rendered lines, inserted verbatim by a merge
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Desired identifiers in the order they appear in the fragment
    pub fn identifiers(&self) -> &[Identifier] {
        &self.order
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.identifiers.contains(identifier)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed == "!"
}

/// Summary of one category merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub category: Category,
    pub action: MergeAction,
    /// Overlap blocks found in the old text
    pub overlap: usize,
    /// Stale managed blocks deleted
    pub stale_removed: usize,
    /// Operator-owned blocks left in place
    pub operator_owned: usize,
    /// Whether the text differs from the old text
    pub changed: bool,
}

/// Result of merging one category
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub text: ConfigText,
    pub report: MergeReport,
}

/// Merge a desired set into `old`, returning the new text and a report
pub fn merge(old: &ConfigText, desired: &DesiredSet, marker: &ManagedMarker) -> Result<MergeOutcome> {
    let merge_plan = plan(old, desired, marker)?;

    for header in &merge_plan.stale_headers {
        warn!("{}: removing stale managed block '{}'", desired.category(), header);
    }
    if merge_plan.operator_owned > 0 {
        debug!(
            "{}: leaving {} operator-owned block(s) untouched",
            desired.category(),
            merge_plan.operator_owned
        );
    }

    let mut text = old.clone();
    merge_plan.apply(&mut text, desired);
    let changed = &text != old;

    info!(
        "{}: {} ({} overlapping, {} stale){}",
        desired.category(),
        merge_plan.action,
        merge_plan.overlap,
        merge_plan.stale_headers.len(),
        if changed { "" } else { ", no change" }
    );

    Ok(MergeOutcome {
        text,
        report: MergeReport {
            category: desired.category(),
            action: merge_plan.action,
            overlap: merge_plan.overlap,
            stale_removed: merge_plan.stale_headers.len(),
            operator_owned: merge_plan.operator_owned,
            changed,
        },
    })
}

/// Merge rendered text for `category` into a configuration string
pub fn merge_str(old: &str, category: Category, rendered: &str, marker: &ManagedMarker) -> Result<String> {
    let desired = DesiredSet::from_rendered(category, rendered)?;
    let outcome = merge(&ConfigText::from(old), &desired, marker)?;
    Ok(outcome.text.to_string())
}
