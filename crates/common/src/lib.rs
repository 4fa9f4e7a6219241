//! Common types shared by the compose compliance components.
//!
//! The target service and the compliance harness agree on a tiny wire
//! contract: JSON replies wrapped in `{"response": ...}` and UDP datagrams
//! wrapped in `{"request": ...}`. Both sides depend on this crate so the
//! contract lives in exactly one place.

#![warn(clippy::pedantic)]

/// Module for the wire types and literals of the target service contract
pub mod types;
