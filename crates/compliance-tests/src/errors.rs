//! Harness error types.

use crate::process::ExpectedOutcome;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while driving a tool or verifying a scenario.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn `{command}` (is it on PATH?): {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "`{command}` finished with {status} but {expected} was expected\n\
         --- stdout ---\n{stdout}\n--- stderr ---\n{stderr}"
    )]
    UnexpectedOutcome {
        command: String,
        expected: ExpectedOutcome,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("No tool descriptors found in {}", dir.display())]
    EmptyCatalogue { dir: PathBuf },

    #[error("Malformed tool descriptor {}: {reason}", path.display())]
    MalformedDescriptor { path: PathBuf, reason: String },

    #[error("Tool name {name:?} is declared by both {first} and {second}")]
    DuplicateTool {
        name: String,
        first: String,
        second: String,
    },

    #[error(
        "Problem checking containers' state: {count} record(s) left after down. \
         There shouldn't be any containers before or after a test.\n\
         {status_output}\nPlease refer to: {reference}"
    )]
    ResidualState {
        count: usize,
        status_output: String,
        reference: String,
    },

    #[error("\n- expected: {expected:?}\n+ actual: {actual:?}\nPlease refer to: {reference}")]
    Mismatch {
        expected: String,
        actual: String,
        reference: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UDP send to {addr} failed: {source}")]
    Udp {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Target service not ready: {0}")]
    NotReady(String),
}
