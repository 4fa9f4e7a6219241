//! Harness configuration.
//!
//! The harness takes no command-line flags. Directory layout and the target
//! service location can be overridden through environment variables; the
//! defaults match the repository layout and the fixtures' published ports.

use common::types::{DEFAULT_HTTP_PORT, DEFAULT_UDP_PORT};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Directory of tool descriptors, relative to the root.
pub const DEFAULT_COMMANDS_DIR: &str = "commands";

/// Directory of deployment fixtures, relative to the root.
pub const DEFAULT_FIXTURES_DIR: &str = "fixtures";

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory holding one `*.yml` descriptor per tool under test.
    pub commands_dir: PathBuf,
    /// Directory holding one sub-directory per scenario.
    pub fixtures_dir: PathBuf,
    /// Base URL of the deployed target service's HTTP surface.
    pub target_http_url: String,
    /// `host:port` of the deployed target service's UDP listener.
    pub target_udp_addr: String,
}

impl HarnessConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    ///
    /// - `COMPLIANCE_ROOT`: base for relative directories (default: workspace root)
    /// - `COMPLIANCE_COMMANDS_DIR`: descriptor directory (default: `commands`)
    /// - `COMPLIANCE_FIXTURES_DIR`: fixture directory (default: `fixtures`)
    /// - `TARGET_HTTP_URL`: default `http://127.0.0.1:8080`
    /// - `TARGET_UDP_ADDR`: default `127.0.0.1:10001`
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let root = vars
            .get("COMPLIANCE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(workspace_root);

        let commands_dir = root.join(
            vars.get("COMPLIANCE_COMMANDS_DIR")
                .map(String::as_str)
                .unwrap_or(DEFAULT_COMMANDS_DIR),
        );
        let fixtures_dir = root.join(
            vars.get("COMPLIANCE_FIXTURES_DIR")
                .map(String::as_str)
                .unwrap_or(DEFAULT_FIXTURES_DIR),
        );

        let target_http_url = vars
            .get("TARGET_HTTP_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", DEFAULT_HTTP_PORT));

        let target_udp_addr = vars
            .get("TARGET_UDP_ADDR")
            .cloned()
            .unwrap_or_else(|| format!("127.0.0.1:{}", DEFAULT_UDP_PORT));

        Self {
            commands_dir,
            fixtures_dir,
            target_http_url,
            target_udp_addr,
        }
    }

    /// Working directory for a scenario's tool invocations.
    pub fn fixture_dir(&self, fixture: &str) -> PathBuf {
        self.fixtures_dir.join(fixture)
    }
}

/// Repository root, two levels above this crate's manifest.
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}
