//! # Error Handling
//!
//! This module defines the centralized error type for `config-splice`. It uses
//! the `thiserror` library to build a single `Error` enum covering every
//! failure the merge engine, the file-backed collaborators and the host
//! pipeline can report.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Merge engine variants (`HeaderParse`,
//!   `UnterminatedBlock`, `AmbiguousInsertion`, `RenderedText`) carry the
//!   category and the offending header or line so that a failure can be
//!   traced back to the configuration text that caused it.
//!
//! - **`Error::Stage`**: Wraps any error raised while a host is being
//!   processed with the host name and the category of the stage that failed.
//!   Host failures never abort other hosts; the pipeline reports them per host.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use thiserror::Error;

use crate::category::Category;

/// Main error type for config-splice operations
#[derive(Error, Debug)]
pub enum Error {
    /// A header matched the coarse rule of a category but its identifier
    /// could not be extracted.
    #[error("Header parse error ({category}): cannot extract identifier from '{header}'")]
    HeaderParse { category: Category, header: String },

    /// A block body could not be terminated consistently.
    ///
    /// Running into the end of the text is a valid terminator and is never
    /// reported here. This variant covers bodies whose indentation switches
    /// between tabs and spaces, where the span boundary cannot be trusted.
    #[error("Unterminated block ({category}) '{header}': inconsistent indentation at line {line}")]
    UnterminatedBlock {
        category: Category,
        header: String,
        /// 1-based line number of the offending body line
        line: usize,
    },

    /// The merge plan did not hold exactly one insertion point.
    #[error("Ambiguous insertion ({category}): {candidates} insertion points computed")]
    AmbiguousInsertion { category: Category, candidates: usize },

    /// Rendered text contains content outside of any block of its category.
    #[error("Rendered text error ({category}): unexpected line '{line}'")]
    RenderedText { category: Category, line: String },

    /// A host-scoped failure. Carries the host and the stage that failed.
    #[error("Host {host} failed at {category} stage: {source}")]
    Stage {
        host: String,
        category: Category,
        #[source]
        source: Box<Error>,
    },

    /// An error occurred while parsing the configuration file.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An error occurred while reading or writing host artifacts.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// The host worker pool could not be built.
    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Wrap this error with the host and stage it occurred in.
    pub fn in_stage(self, host: &str, category: Category) -> Self {
        Error::Stage {
            host: host.to_string(),
            category,
            source: Box::new(self),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
