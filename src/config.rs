//! # Configuration Schema and Parsing
//!
//! This module defines the `.config-splice.yaml` file, which tells the
//! pipeline where captured configurations and rendered fragments live, which
//! hosts to process, and which marker identifies managed blocks.
//!
//! ```yaml
//! managed_marker: Managed-By-Tool
//! workers: 10
//! running_dir: running_configs
//! rendered_dir: rendered_configs
//! output_dir: merged_configs
//! hosts: [r1, r2]
//! ```
//!
//! Every key is optional. Relative directories are resolved against the
//! directory containing the configuration file. An empty host list means
//! "every host with a captured configuration in `running_dir`".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::ownership::{ManagedMarker, DEFAULT_MARKER};

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Token marking tool-owned blocks (case-insensitive)
    #[serde(default = "default_marker")]
    pub managed_marker: String,
    /// Number of hosts processed concurrently
    #[serde(default = "defaults::default_workers")]
    pub workers: usize,
    /// Directory with `<host>_config` captured running configurations
    #[serde(default = "defaults::default_running_dir")]
    pub running_dir: PathBuf,
    /// Directory with one subdirectory of rendered fragments per host
    #[serde(default = "defaults::default_rendered_dir")]
    pub rendered_dir: PathBuf,
    /// Directory receiving `<host>_config` merged configurations
    #[serde(default = "defaults::default_output_dir")]
    pub output_dir: PathBuf,
    /// Hosts to process
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            managed_marker: default_marker(),
            workers: defaults::default_workers(),
            running_dir: defaults::default_running_dir(),
            rendered_dir: defaults::default_rendered_dir(),
            output_dir: defaults::default_output_dir(),
            hosts: Vec::new(),
        }
    }
}

impl Settings {
    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::ConfigParse {
                message: "workers must be greater than zero".to_string(),
                hint: Some("Remove the key to use the default of 10 workers".to_string()),
            });
        }
        if self.managed_marker.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "managed_marker must not be empty".to_string(),
                hint: Some(format!("Use the default marker '{}'", DEFAULT_MARKER)),
            });
        }
        if let Some(host) = self.hosts.iter().find(|h| h.trim().is_empty() || h.contains('/')) {
            return Err(Error::ConfigParse {
                message: format!("invalid host name '{}'", host),
                hint: Some("Host names are used as file names and cannot contain '/'".to_string()),
            });
        }
        Ok(())
    }

    pub fn marker(&self) -> ManagedMarker {
        ManagedMarker::new(self.managed_marker.trim())
    }

    /// Resolve relative directories against `base`
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        for dir in [
            &mut self.running_dir,
            &mut self.rendered_dir,
            &mut self.output_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        self
    }
}

/// Parse settings from a YAML string.
///
/// An empty document yields the default settings.
pub fn parse(yaml_content: &str) -> Result<Settings> {
    let settings = if yaml_content.trim().is_empty() {
        Settings::default()
    } else {
        serde_yaml::from_str::<Settings>(yaml_content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: None,
        })?
    };
    settings.validate()?;
    Ok(settings)
}

/// Parse settings from a YAML file, resolving directories against its parent
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let base = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(parse(&content)?.resolve_paths(&base))
}
