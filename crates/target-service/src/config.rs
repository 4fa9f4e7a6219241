//! Target service configuration.
//!
//! All settings come from environment variables so fixtures can tune the
//! service from their compose files without rebuilding the image.

use common::types::{DEFAULT_HTTP_PORT, DEFAULT_UDP_PORT};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Directory fixtures mount volumes, secrets and configs under.
pub const DEFAULT_VOLUMES_ROOT: &str = "/volumes";

/// Host (with port) whose DNS records are counted by `/scalechecker`.
pub const DEFAULT_SCALE_CHECK_HOST: &str = "target:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_host: String,
    pub http_port: u16,
    pub udp_port: u16,
    pub volumes_root: PathBuf,
    pub scale_check_host: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port in {var}: {value:?}")]
    InvalidPort { var: String, value: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_host = vars
            .get("BIND_HOST")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let http_port = parse_port(vars, "HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let udp_port = parse_port(vars, "UDP_PORT", DEFAULT_UDP_PORT)?;

        let volumes_root = vars
            .get("VOLUMES_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VOLUMES_ROOT));

        let scale_check_host = vars
            .get("SCALE_CHECK_HOST")
            .cloned()
            .unwrap_or_else(|| DEFAULT_SCALE_CHECK_HOST.to_string());

        Ok(Config {
            bind_host,
            http_port,
            udp_port,
            volumes_root,
            scale_check_host,
        })
    }

    /// Address the HTTP server binds to.
    pub fn http_bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.http_port)
    }

    /// Address the UDP listener binds to.
    pub fn udp_bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.udp_port)
    }
}

fn parse_port(
    vars: &HashMap<String, String>,
    var: &str,
    default: u16,
) -> Result<u16, ConfigError> {
    match vars.get(var).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
