//! # Config Splice Library
//!
//! This library splices freshly rendered configuration fragments into the
//! captured running configuration of a network device, producing one
//! consolidated text to redeploy with a replace-style load. It is used by the
//! `config-splice` command-line tool but can be driven directly by any
//! automation that captures configurations and renders templates itself.
//!
//! ## Quick Example
//!
//! ```
//! use config_splice::category::Category;
//! use config_splice::merge::merge_str;
//! use config_splice::ownership::ManagedMarker;
//!
//! let running = "\
//! interface Loopback1
//!  description old
//! interface Loopback2
//!  description old2
//! ";
//! let rendered = "\
//! interface Loopback1
//!  description Managed-By-Tool
//! interface Loopback3
//!  description Managed-By-Tool
//! ";
//!
//! let merged = merge_str(running, Category::Loopbacks, rendered, &ManagedMarker::default()).unwrap();
//! assert!(merged.starts_with("interface Loopback1\n description Managed-By-Tool\ninterface Loopback3"));
//! assert!(merged.ends_with("interface Loopback2\n description old2\n"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Blocks (`block`)**: A header line and its indented body, the unit the
//!   engine edits. Extraction is a line scan that records each block's span.
//! - **Categories (`category`)**: Loopbacks, sub-interfaces, prefix-lists,
//!   route-maps and the BGP process, each with its own header grammar.
//! - **Identifiers (`identifier`)**: The stable key of a block within its
//!   category.
//! - **Ownership (`ownership`)**: Blocks carrying the management marker are
//!   tool-owned; all others belong to the operator.
//! - **Merge (`merge`)**: Decides which blocks to replace, which to delete as
//!   stale and where to insert the rendered fragment.
//! - **Pipeline (`pipeline`)**: Runs the categories in a fixed order for each
//!   host, and runs hosts on a bounded worker pool.
//!
//! ## Execution Flow
//!
//! 1.  **Capture**: Fetch the running configuration of each host
//!     (`collab::ConfigSource`).
//! 2.  **Render**: Obtain the rendered fragment of every category
//!     (`collab::Renderer`).
//! 3.  **Merge**: Loopbacks, sub-interfaces, prefix-lists, route-maps, BGP.
//! 4.  **Push**: Hand the final text over (`collab::ConfigSink`).
//!
//! `store::DirectoryStore` implements the collaborators over plain files.

pub mod block;
pub mod category;
pub mod collab;
pub mod config;
pub mod defaults;
pub mod error;
pub mod identifier;
pub mod merge;
pub mod output;
pub mod ownership;
pub mod pipeline;
pub mod store;
pub mod suggestions;
pub mod text;

#[cfg(test)]
mod merge_proptest;
