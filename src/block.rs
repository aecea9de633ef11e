//! Block extraction
//!
//! A block is a header line followed by every immediately following line
//! that begins with whitespace. The block ends at the first non-indented line
//! or at the end of the text; both are valid terminators.
//!
//! Extraction never fails. A text without any header of the requested
//! category simply yields no blocks. Spans are returned in document order and
//! never overlap.

use std::ops::Range;

use crate::category::Category;
use crate::error::{Error, Result};
use crate::text::ConfigText;

/// How a block body ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The body ended at a non-indented line
    NextLine,
    /// The body ran to the end of the text
    EndOfText,
}

/// A header line and its indented body, located in a configuration text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub category: Category,
    pub header: String,
    pub body: Vec<String>,
    /// Half-open line range covering the header and the body
    pub span: Range<usize>,
    pub terminator: Terminator,
}

impl Block {
    /// Header and body lines, in order
    pub fn lines(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.header).chain(self.body.iter())
    }

    /// Reject bodies that switch between tab and space indentation.
    ///
    /// Such a body may have swallowed lines belonging elsewhere, so its span
    /// must not be edited.
    pub fn check_indentation(&self) -> Result<()> {
        let mut style = None;
        for (offset, line) in self.body.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some(first) = line.chars().next() else {
                continue;
            };
            match style {
                None => style = Some(first),
                Some(expected) if expected != first => {
                    return Err(Error::UnterminatedBlock {
                        category: self.category,
                        header: self.header.clone(),
                        line: self.span.start + offset + 2,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// Extract every block of `category` from `text`, in document order
pub fn extract_blocks(text: &ConfigText, category: Category) -> Vec<Block> {
    extract_from_lines(text.lines(), category)
}

/// Extract every block of `category` from a slice of lines
pub fn extract_from_lines(lines: &[String], category: Category) -> Vec<Block> {
    let blank_lines_in_body = category.grammar().blank_lines_in_body;
    let mut blocks = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        if !category.matches_header(&lines[index]) {
            index += 1;
            continue;
        }

        let start = index;
        let mut end = index + 1;
        loop {
            if end < lines.len() && is_indented(&lines[end]) {
                end += 1;
                continue;
            }
            if blank_lines_in_body && end < lines.len() && lines[end].trim().is_empty() {
                let next = lines[end..]
                    .iter()
                    .position(|line| !line.trim().is_empty())
                    .map(|offset| end + offset);
                if let Some(next) = next.filter(|&n| is_indented(&lines[n])) {
                    end = next;
                    continue;
                }
            }
            break;
        }

        blocks.push(Block {
            category,
            header: lines[start].clone(),
            body: lines[start + 1..end].to_vec(),
            span: start..end,
            terminator: if end >= lines.len() {
                Terminator::EndOfText
            } else {
                Terminator::NextLine
            },
        });
        index = end;
    }

    blocks
}
