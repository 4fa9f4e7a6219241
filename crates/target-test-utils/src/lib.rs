//! # Target Test Utilities
//!
//! Shared test utilities for the target service.
//!
//! This crate provides:
//! - Server test harness (`TestTargetServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use target_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<()> {
//!     let volumes = tempfile::tempdir()?;
//!     let server = TestTargetServer::spawn(volumes.path()).await?;
//!
//!     let body = reqwest::get(format!("{}/ping", server.url()))
//!         .await?
//!         .text()
//!         .await?;
//!
//!     assert_eq!(body, r#"{"response":"PONG FROM TARGET"}"#);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
