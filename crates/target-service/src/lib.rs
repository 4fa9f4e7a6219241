//! Target Service Library
//!
//! The target service is the small program every compliance fixture deploys.
//! The harness never talks to the orchestrator about it; it only observes the
//! service from outside over HTTP and UDP.
//!
//! # Modules
//!
//! - `config` - Environment configuration
//! - `errors` - Error types and their HTTP rendering
//! - `handlers` - HTTP request handlers
//! - `routes` - Router and application state
//! - `tasks` - Background tasks (UDP listener)

pub mod config;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod tasks;
