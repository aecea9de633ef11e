//! Identifier resolution
//!
//! Every block of a category is keyed by a stable identifier taken from its
//! header: the loopback number, the `2.<n>` sub-interface suffix, the
//! prefix-list or route-map name, or the fixed `default` key of the single
//! BGP process. Two blocks with the same category and identifier are the same
//! logical unit.

use std::fmt;

use crate::block::Block;
use crate::category::{Category, IdentifierRule};
use crate::error::{Error, Result};

/// Category-specific key of a block
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the identifier of an extracted block
pub fn resolve_identifier(block: &Block) -> Result<Identifier> {
    resolve_header(block.category, &block.header)
}

/// Resolve the identifier of a header line for `category`.
///
/// Fails with `Error::HeaderParse` when the header does not follow the
/// category grammar, including headers of a different category.
pub fn resolve_header(category: Category, header: &str) -> Result<Identifier> {
    let grammar = category.grammar();
    let header = header.trim_end();
    let parse_error = || Error::HeaderParse {
        category,
        header: header.to_string(),
    };

    let captures = grammar.identifier.captures(header).ok_or_else(parse_error)?;
    match grammar.rule {
        IdentifierRule::Fixed(key) => Ok(Identifier(key.to_string())),
        IdentifierRule::Capture => captures
            .get(1)
            .map(|m| Identifier(m.as_str().to_string()))
            .ok_or_else(parse_error),
    }
}
