//! Directory-backed collaborators
//!
//! `DirectoryStore` reads and writes the per-host artifacts of a run:
//!
//! ```text
//! <running_dir>/<host>_config             captured running configuration
//! <rendered_dir>/<host>/loopbacks_final    rendered fragment, one per category
//! <rendered_dir>/<host>/interfaces_final
//! <rendered_dir>/<host>/pl_final
//! <rendered_dir>/<host>/rm_final
//! <rendered_dir>/<host>/bgp_final
//! <output_dir>/<host>_config              merged configuration
//! ```
//!
//! All files are plain UTF-8 text. Reading and writing happen only at the
//! pipeline boundary; the merge engine itself works on in-memory values.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::category::Category;
use crate::collab::{ConfigSink, ConfigSource, Renderer};
use crate::config::Settings;
use crate::error::{Error, Result};

const CONFIG_SUFFIX: &str = "_config";

/// Lines of device output that precede the configuration proper
const PREAMBLE_SCAN_LINES: usize = 10;

/// File-backed `ConfigSource`, `Renderer` and `ConfigSink`
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    running_dir: PathBuf,
    rendered_dir: PathBuf,
    output_dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(running_dir: PathBuf, rendered_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            running_dir,
            rendered_dir,
            output_dir,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.running_dir.clone(),
            settings.rendered_dir.clone(),
            settings.output_dir.clone(),
        )
    }

    pub fn running_path(&self, host: &str) -> PathBuf {
        self.running_dir.join(format!("{}{}", host, CONFIG_SUFFIX))
    }

    pub fn fragment_path(&self, host: &str, category: Category) -> PathBuf {
        self.rendered_dir.join(host).join(category.fragment_file())
    }

    pub fn output_path(&self, host: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}", host, CONFIG_SUFFIX))
    }

    /// Hosts with a captured configuration in the running directory, sorted
    pub fn discover_hosts(&self) -> Vec<String> {
        let mut hosts = Vec::new();
        for entry in WalkDir::new(&self.running_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if let Some(host) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(CONFIG_SUFFIX))
                .filter(|host| !host.is_empty())
            {
                hosts.push(host.to_string());
            }
        }
        hosts.sort();
        hosts
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to read file '{}': {}", path.display(), e),
    })
}

/// Drop the banner a device prints before its running configuration.
///
/// Everything up to and including a `Current configuration : N bytes` line
/// near the top is removed, as is a leading `Building configuration...` line.
/// CRLF line endings are kept.
pub fn strip_preamble(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let head = lines.len().min(PREAMBLE_SCAN_LINES);

    let skip = if let Some(pos) = lines[..head]
        .iter()
        .position(|line| line.trim_start().starts_with("Current configuration"))
    {
        pos + 1
    } else if lines
        .first()
        .is_some_and(|line| line.trim_start().starts_with("Building configuration"))
    {
        1
    } else {
        return text.to_string();
    };

    let skip = skip
        + lines[skip..]
            .iter()
            .take_while(|line| line.trim().is_empty())
            .count();
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut out = lines[skip..].join(newline);
    if text.ends_with('\n') && !out.is_empty() {
        out.push_str(newline);
    }
    out
}

impl ConfigSource for DirectoryStore {
    fn fetch_running_config(&self, host: &str) -> Result<String> {
        let text = read_text(&self.running_path(host))?;
        Ok(strip_preamble(&text))
    }
}

impl Renderer for DirectoryStore {
    fn render(&self, host: &str, category: Category) -> Result<Option<String>> {
        let path = self.fragment_path(host, category);
        if !path.is_file() {
            return Ok(None);
        }
        read_text(&path).map(Some)
    }
}

impl ConfigSink for DirectoryStore {
    fn push_config(&self, host: &str, text: &str) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::Filesystem {
            message: format!(
                "Failed to create directory '{}': {}",
                self.output_dir.display(),
                e
            ),
        })?;

        let path = self.output_path(host);
        let mut content = text.to_string();
        if !content.ends_with('\n') {
            content.push('\n');
        }
        fs::write(&path, content).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(root: &Path) -> DirectoryStore {
        DirectoryStore::new(
            root.join("running"),
            root.join("rendered"),
            root.join("out"),
        )
    }

    #[test]
    fn test_strip_preamble_removes_device_banner() {
        let raw = "Building configuration...\n\nCurrent configuration : 1234 bytes\n!\nversion 16.9\nend\n";
        assert_eq!(strip_preamble(raw), "!\nversion 16.9\nend\n");
    }

    #[test]
    fn test_strip_preamble_keeps_crlf() {
        let text = "Building configuration...\r\n\r\nCurrent configuration : 42 bytes\r\nhostname r1\r\nend\r\n";
        assert_eq!(strip_preamble(text), "hostname r1\r\nend\r\n");
    }

    #[test]
    fn test_strip_preamble_building_line_only() {
        let raw = "Building configuration...\n\nhostname r1\n";
        assert_eq!(strip_preamble(raw), "hostname r1\n");
    }

    #[test]
    fn test_strip_preamble_leaves_plain_config() {
        let raw = "hostname r1\ninterface Loopback1\n";
        assert_eq!(strip_preamble(raw), raw);
    }

    #[test]
    fn test_fetch_reads_captured_config() {
        let temp = TempDir::new().unwrap();
        let store = store(temp.path());
        fs::create_dir_all(temp.path().join("running")).unwrap();
        fs::write(store.running_path("r1"), "hostname r1\n").unwrap();

        assert_eq!(store.fetch_running_config("r1").unwrap(), "hostname r1\n");
    }

    #[test]
    fn test_fetch_missing_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = store(temp.path()).fetch_running_config("r9").unwrap_err();
        assert!(err.to_string().contains("r9_config"));
    }

    #[test]
    fn test_render_missing_fragment_is_none() {
        let temp = TempDir::new().unwrap();
        let store = store(temp.path());
        assert_eq!(store.render("r1", Category::Bgp).unwrap(), None);

        fs::create_dir_all(temp.path().join("rendered/r1")).unwrap();
        fs::write(store.fragment_path("r1", Category::Bgp), "router bgp 1\n").unwrap();
        assert_eq!(
            store.render("r1", Category::Bgp).unwrap().as_deref(),
            Some("router bgp 1\n")
        );
    }

    #[test]
    fn test_push_creates_output_dir_and_terminates_text() {
        let temp = TempDir::new().unwrap();
        let store = store(temp.path());
        store.push_config("r1", "hostname r1").unwrap();
        let written = fs::read_to_string(store.output_path("r1")).unwrap();
        assert_eq!(written, "hostname r1\n");
    }

    #[test]
    fn test_discover_hosts_sorted() {
        let temp = TempDir::new().unwrap();
        let store = store(temp.path());
        let running = temp.path().join("running");
        fs::create_dir_all(running.join("nested")).unwrap();
        fs::write(running.join("r2_config"), "").unwrap();
        fs::write(running.join("r1_config"), "").unwrap();
        fs::write(running.join("notes.txt"), "").unwrap();
        fs::write(running.join("nested/r3_config"), "").unwrap();

        assert_eq!(store.discover_hosts(), vec!["r1", "r2"]);
    }

    #[test]
    fn test_discover_hosts_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(store(temp.path()).discover_hosts().is_empty());
    }
}
