//! # External Collaborators
//!
//! The merge engine does not talk to devices and does not render templates.
//! Those concerns are modelled as three traits so that the pipeline can be
//! driven by any implementation:
//!
//! - **`ConfigSource`**: produces the captured running configuration of a
//!   host (a device session, or a file captured earlier).
//! - **`Renderer`**: produces the rendered fragment of one category for a
//!   host, already in final textual form.
//! - **`ConfigSink`**: receives the final configuration text of a host and
//!   performs the replace-style load (or writes it out for review).
//!
//! `store::DirectoryStore` implements all three over a directory layout. In
//! tests, in-memory implementations stand in for devices and templates.

use crate::category::Category;
use crate::error::Result;

/// Source of captured running configurations
pub trait ConfigSource: Send + Sync {
    /// Fetch the running configuration of `host`
    fn fetch_running_config(&self, host: &str) -> Result<String>;
}

/// Source of rendered per-category fragments
pub trait Renderer: Send + Sync {
    /// Render the fragment of `category` for `host`.
    ///
    /// `Ok(None)` means the host has no fragment for this category and the
    /// stage is skipped. `Ok(Some(""))` is an empty desired set, which still
    /// removes stale managed blocks.
    fn render(&self, host: &str, category: Category) -> Result<Option<String>>;
}

/// Destination of merged configurations
pub trait ConfigSink: Send + Sync {
    /// Hand the final configuration of `host` over for deployment
    fn push_config(&self, host: &str, text: &str) -> Result<()>;
}
