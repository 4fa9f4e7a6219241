//! Test fixtures for interacting with the deployed target service.

pub mod target_client;

pub use target_client::TargetClient;
