//! Ownership classification
//!
//! A block is *managed* when its body carries the management marker, usually
//! as part of a `description` line written by the templates. Prefix-list
//! entries have no body, so for them the entry line itself is inspected
//! (`ip prefix-list PL_BGP_X description Managed-By-Tool`).
//!
//! Ownership belongs to the logical unit, not to a single block: when any
//! block of an identifier is managed, every block sharing that identifier is.
//! Units without the marker belong to the operator and are never removed as
//! stale.

use std::collections::BTreeSet;

use crate::block::Block;
use crate::identifier::Identifier;

/// Default marker written into managed blocks
pub const DEFAULT_MARKER: &str = "Managed-By-Tool";

/// Case-insensitive token identifying tool-owned blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedMarker {
    token: String,
    folded: String,
}

impl ManagedMarker {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let folded = token.to_lowercase();
        Self { token, folded }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn marks(&self, line: &str) -> bool {
        line.to_lowercase().contains(&self.folded)
    }

    /// Whether the marker occurs anywhere in the block body.
    ///
    /// The header is only inspected for categories whose entries are single
    /// lines.
    pub fn is_managed(&self, block: &Block) -> bool {
        if self.folded.is_empty() {
            return false;
        }
        (block.category.grammar().marker_in_header && self.marks(&block.header))
            || block.body.iter().any(|line| self.marks(line))
    }

    /// Identifiers with at least one managed block
    pub fn managed_identifiers<'a, I>(&self, blocks: I) -> BTreeSet<Identifier>
    where
        I: IntoIterator<Item = (&'a Identifier, &'a Block)>,
    {
        blocks
            .into_iter()
            .filter(|(_, block)| self.is_managed(block))
            .map(|(identifier, _)| identifier.clone())
            .collect()
    }
}

impl Default for ManagedMarker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}
