//! Background tasks for the target service.
//!
//! # Tasks
//!
//! - `udp_listener` - Captures the latest UDP datagram for `/udp`

pub mod udp_listener;

pub use udp_listener::{decode_datagram, start_udp_listener, MAX_DATAGRAM_SIZE};
