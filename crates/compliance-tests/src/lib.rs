//! Compose Compliance Test Suite
//!
//! This crate drives independent implementations of the compose specification
//! through one uniform lifecycle and checks what they deploy from the outside.
//! Each tool under test is described by a YAML file in `commands/`; each
//! scenario is a deployment fixture in `fixtures/<scenario>/` plus a
//! verification callback that probes the target service.
//!
//! For every (scenario, tool) pair the lifecycle driver runs:
//!
//! 1. setup: load the descriptor, skip the tool if the scenario excludes it
//! 2. up: `<command> <global opts> <up> <up opts>` in the fixture directory
//! 3. verify: the scenario's callback
//! 4. down: `<command> <global opts> <down> <down opts>`
//! 5. cleanup check: the descriptor's status command must list nothing but
//!    its header line
//!
//! # Features
//!
//! - `compliance`: scenario tests against real compose tools
//! - `all`: Enable all test categories
//!
//! # Prerequisites
//!
//! 1. Every tool named in `commands/*.yml` on `PATH`
//! 2. The target service image built:
//!    `docker build -t compose-compliance/target-service:latest .`
//! 3. Nothing else running that the status commands would list
//!
//! # Usage
//!
//! ```bash
//! # Driver and client tests only (no docker required)
//! cargo test -p compliance-tests
//!
//! # Full scenario catalogue
//! cargo test -p compliance-tests --features compliance
//! ```

pub mod catalogue;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod eventual;
pub mod fixtures;
pub mod lifecycle;
pub mod process;
pub mod scenario;

pub use config::HarnessConfig;
pub use errors::HarnessError;
pub use lifecycle::{LifecycleDriver, ScenarioReport};
pub use scenario::Scenario;

/// Install a test-friendly tracing subscriber.
///
/// Safe to call from every test; only the first call installs anything.
/// Honors `RUST_LOG`, defaulting to `compliance_tests=info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "compliance_tests=info".into()),
        )
        .with_test_writer()
        .try_init();
}
