//! HTTP request handlers for the target service.

pub mod health;
pub mod ping;
pub mod scale;
pub mod udp;
pub mod volume;

pub use health::health_check;
pub use ping::ping;
pub use scale::scale_check;
pub use udp::last_udp_payload;
pub use volume::volume_file;
