//! Line-oriented configuration text buffer
//!
//! A `ConfigText` is the captured running configuration of one host. It is
//! stored as an ordered list of lines plus the line-ending style (LF or CRLF)
//! and whether the original text ended with a newline, so that `to_string`
//! reproduces the input byte for byte when no edits were made. Lines spliced
//! in are written with the buffer's line ending.
//!
//! The buffer is only ever changed by whole-span substitution
//! (`ConfigText::splice`). Spans are half-open line ranges as produced by
//! the block extractor.

use std::fmt;
use std::ops::Range;

/// An ordered sequence of configuration lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigText {
    lines: Vec<String>,
    trailing_newline: bool,
    crlf: bool,
}

impl ConfigText {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines of the buffer, without line terminators
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replace the lines in `span` with `replacement`.
    ///
    /// An empty replacement deletes the span; an empty span inserts.
    pub fn splice(&mut self, span: Range<usize>, replacement: &[String]) {
        let end = span.end.min(self.lines.len());
        let start = span.start.min(end);
        self.lines.splice(start..end, replacement.iter().cloned());
    }

    /// Append lines at the end of the buffer
    ///
    /// A buffer that was empty gains a trailing newline so that the appended
    /// text keeps its terminator.
    pub fn append(&mut self, lines: &[String]) {
        if self.lines.is_empty() {
            self.trailing_newline = true;
        }
        self.lines.extend(lines.iter().cloned());
    }

    /// Index of a closing `end` line, if the text is terminated by one.
    ///
    /// Trailing blank lines are ignored. Device configurations end with a
    /// bare `end`; content appended after it would be dropped on load.
    pub fn closing_end_line(&self) -> Option<usize> {
        let last = self
            .lines
            .iter()
            .rposition(|line| !line.trim().is_empty())?;
        if self.lines[last].trim() == "end" {
            Some(last)
        } else {
            None
        }
    }
}

impl From<&str> for ConfigText {
    fn from(content: &str) -> Self {
        Self {
            lines: content.lines().map(|line| line.to_string()).collect(),
            trailing_newline: content.ends_with('\n'),
            crlf: content.contains("\r\n"),
        }
    }
}

impl From<String> for ConfigText {
    fn from(content: String) -> Self {
        Self::from(content.as_str())
    }
}

impl fmt::Display for ConfigText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let newline = if self.crlf { "\r\n" } else { "\n" };
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                f.write_str(newline)?;
            }
            f.write_str(line)?;
        }
        if self.trailing_newline && !self.lines.is_empty() {
            f.write_str(newline)?;
        }
        Ok(())
    }
}
