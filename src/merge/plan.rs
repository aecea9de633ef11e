//! Merge planning
//!
//! Planning is separated from application so the edit can be inspected (and
//! checked for ambiguity) before the text is touched. A plan is a list of
//! span edits against the old text; applying them in descending start order
//! keeps every span valid while the buffer shrinks or grows.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use super::DesiredSet;
use crate::block::{extract_blocks, Block};
use crate::error::{Error, Result};
use crate::identifier::{resolve_identifier, Identifier};
use crate::ownership::ManagedMarker;
use crate::text::ConfigText;

/// A single span edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the span with the rendered fragment (an empty span inserts)
    Insert(Range<usize>),
    /// Remove the span
    Delete(Range<usize>),
}

impl Edit {
    pub fn span(&self) -> &Range<usize> {
        match self {
            Edit::Insert(span) | Edit::Delete(span) => span,
        }
    }
}

/// Which branch of the merge algorithm was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeAction {
    /// The last overlapping block was replaced by the fragment
    ReplacedOverlap,
    /// No block overlapped; the first stale block was replaced
    ReplacedStale,
    /// Nothing to replace; the fragment was appended
    Appended,
    /// Empty fragment and nothing stale
    Unchanged,
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MergeAction::ReplacedOverlap => "replaced overlapping blocks",
            MergeAction::ReplacedStale => "replaced stale blocks",
            MergeAction::Appended => "appended",
            MergeAction::Unchanged => "unchanged",
        })
    }
}

/// The edit computed for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub action: MergeAction,
    pub edits: Vec<Edit>,
    pub overlap: usize,
    pub stale_headers: Vec<String>,
    pub operator_owned: usize,
}

impl MergePlan {
    /// Apply the plan to `text`
    pub fn apply(&self, text: &mut ConfigText, desired: &DesiredSet) {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by(|a, b| b.span().start.cmp(&a.span().start));

        for edit in edits {
            match edit {
                Edit::Insert(span) if span.is_empty() && span.start >= text.len() => {
                    text.append(desired.lines())
                }
                Edit::Insert(span) => text.splice(span.clone(), desired.lines()),
                Edit::Delete(span) => text.splice(span.clone(), &[]),
            }
        }
    }
}

/// Compute the merge plan of `desired` against `text`
pub fn plan(text: &ConfigText, desired: &DesiredSet, marker: &ManagedMarker) -> Result<MergePlan> {
    let category = desired.category();

    let mut overlap: Vec<Block> = Vec::new();
    let mut stale: Vec<Block> = Vec::new();
    let mut operator_owned = 0;

    let resolved = extract_blocks(text, category)
        .into_iter()
        .map(|block| Ok((resolve_identifier(&block)?, block)))
        .collect::<Result<Vec<(Identifier, Block)>>>()?;
    let managed = marker.managed_identifiers(resolved.iter().map(|(id, block)| (id, block)));

    for (identifier, block) in resolved {
        if desired.contains(&identifier) {
            block.check_indentation()?;
            overlap.push(block);
        } else if managed.contains(&identifier) {
            block.check_indentation()?;
            stale.push(block);
        } else {
            operator_owned += 1;
        }
    }

    let mut edits = Vec::new();
    let action = if let Some((last, rest)) = overlap.split_last() {
        edits.push(Edit::Insert(last.span.clone()));
        edits.extend(rest.iter().map(|block| Edit::Delete(block.span.clone())));
        edits.extend(stale.iter().map(|block| Edit::Delete(block.span.clone())));
        MergeAction::ReplacedOverlap
    } else if let Some((first, rest)) = stale.split_first() {
        edits.push(Edit::Insert(first.span.clone()));
        edits.extend(rest.iter().map(|block| Edit::Delete(block.span.clone())));
        MergeAction::ReplacedStale
    } else if !desired.is_empty() {
        let at = text.closing_end_line().unwrap_or(text.len());
        edits.push(Edit::Insert(at..at));
        MergeAction::Appended
    } else {
        MergeAction::Unchanged
    };

    let inserts = edits.iter().filter(|e| matches!(e, Edit::Insert(_))).count();
    if !desired.is_empty() && inserts != 1 {
        return Err(Error::AmbiguousInsertion {
            category,
            candidates: inserts,
        });
    }
    let mut spans: Vec<&Range<usize>> = edits.iter().map(Edit::span).collect();
    spans.sort_by_key(|span| span.start);
    if spans.windows(2).any(|pair| pair[0].end > pair[1].start) {
        return Err(Error::AmbiguousInsertion {
            category,
            candidates: inserts,
        });
    }

    Ok(MergePlan {
        action,
        edits,
        overlap: overlap.len(),
        stale_headers: stale.into_iter().map(|block| block.header).collect(),
        operator_owned,
    })
}
