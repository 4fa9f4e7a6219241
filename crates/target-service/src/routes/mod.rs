//! HTTP routes for the target service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Per-request deadline, matching the read/write timeouts fixtures expect.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for the outbound request made by `/ping`.
pub const PING_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Client used to relay `/ping` probes.
    pub http_client: reqwest::Client,

    /// Latest UDP payload, published by the UDP listener task.
    pub udp_payload: watch::Receiver<String>,
}

impl AppState {
    /// Build state with a relay client using [`PING_CLIENT_TIMEOUT`].
    pub fn new(
        config: Config,
        udp_payload: watch::Receiver<String>,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(PING_CLIENT_TIMEOUT)
            .build()?;

        Ok(Self {
            config,
            http_client,
            udp_payload,
        })
    }
}

/// Build the application routes.
///
/// - `/ping` - Reachability probe, optionally relayed to another address
/// - `/volumefile` - Mounted file relay
/// - `/udp` - Last captured UDP payload
/// - `/scalechecker` - Replica count of the scaled service
/// - `/health` - Liveness probe
/// - TraceLayer for request logging
/// - 60 second request timeout
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/volumefile", get(handlers::volume_file))
        .route("/udp", get(handlers::last_udp_payload))
        .route("/scalechecker", get(handlers::scale_check))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}
