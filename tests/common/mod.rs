//! Shared test utilities for integration and E2E tests.
//!
//! `LabFixture` lays out a temporary working directory the way a run expects
//! it: captured configurations, rendered fragments and an optional
//! `.config-splice.yaml`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let lab = LabFixture::new()
//!     .with_running("r1", configs::RUNNING_R1)
//!     .with_fragment("r1", "loopbacks_final", "interface Loopback1\n");
//! lab.command().arg("run").assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::LabFixture;
}

/// Configuration texts shared by several tests.
#[allow(dead_code)]
pub mod configs {
    /// A captured configuration with a device banner and one block per category.
    pub const RUNNING_R1: &str = "\
Building configuration...

Current configuration : 512 bytes
!
hostname r1
!
interface Loopback1
 description Managed-By-Tool
 ip address 10.0.0.1 255.255.255.255
interface Loopback2
 description Managed-By-Tool
interface Loopback100
 description operator loopback
interface GigabitEthernet1
 ip address dhcp
interface GigabitEthernet2.10
 description Managed-By-Tool
 encapsulation dot1Q 10
ip prefix-list PL_BGP_OLD seq 5 permit 192.0.2.0/24
route-map RM_BGP_OLD permit 10
 match ip address prefix-list PL_BGP_OLD
router bgp 65000
 bgp log-neighbor-changes
 neighbor 10.1.1.1 remote-as 65001
end
";

    /// Loopback fragment replacing Loopback1 and dropping Loopback2.
    pub const LOOPBACKS: &str = "\
interface Loopback1
 description Managed-By-Tool
 ip address 10.0.0.11 255.255.255.255
";

    pub const BGP: &str = "\
router bgp 65000
 bgp log-neighbor-changes
 neighbor 10.1.1.1 remote-as 65001
 neighbor 10.2.2.2 remote-as 65002
";

    /// Minimal valid settings.
    pub const SETTINGS: &str = "workers: 2\n";

    /// Settings with an unknown key.
    pub const INVALID_SETTINGS: &str = "workerz: 2\n";
}

/// A temporary lab directory with captured and rendered configurations.
pub struct LabFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl LabFixture {
    /// Create a fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.config-splice.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file(".config-splice.yaml", content)
    }

    /// Add a captured running configuration for `host`.
    pub fn with_running(self, host: &str, content: &str) -> Self {
        self.with_file(&format!("running_configs/{}_config", host), content)
    }

    /// Add a rendered fragment (`loopbacks_final`, `bgp_final`, ...) for `host`.
    pub fn with_fragment(self, host: &str, file: &str, content: &str) -> Self {
        self.with_file(&format!("rendered_configs/{}/{}", host, file), content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.path().join(".config-splice.yaml")
    }

    /// Path of the merged configuration written for `host`.
    pub fn output_path(&self, host: &str) -> PathBuf {
        self.path().join(format!("merged_configs/{}_config", host))
    }

    /// Read the merged configuration written for `host`.
    pub fn read_output(&self, host: &str) -> String {
        std::fs::read_to_string(self.output_path(host)).expect("Failed to read merged config")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in this fixture's directory, without colours.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("config-splice");
        cmd.current_dir(self.path())
            .env_remove("CONFIG_SPLICE_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for LabFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_lays_out_lab() {
        let lab = LabFixture::new()
            .with_config(configs::SETTINGS)
            .with_running("r1", "hostname r1\n")
            .with_fragment("r1", "bgp_final", configs::BGP);
        assert!(lab.config_path().exists());
        assert!(lab.path().join("running_configs/r1_config").exists());
        assert!(lab.path().join("rendered_configs/r1/bgp_final").exists());
    }
}
