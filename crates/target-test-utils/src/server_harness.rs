//! Test server harness for E2E testing
//!
//! Provides `TestTargetServer` for spawning real target service instances in tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use target_service::config::Config;
use target_service::routes::{self, AppState};
use target_service::tasks::start_udp_listener;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Test harness for spawning the target service in E2E tests.
///
/// Both the HTTP server and the UDP listener bind to random loopback ports.
/// The UDP listener is shut down through its cancellation token on drop.
pub struct TestTargetServer {
    http_addr: SocketAddr,
    udp_addr: SocketAddr,
    config: Config,
    shutdown_token: CancellationToken,
    _http_handle: JoinHandle<()>,
    _udp_handle: JoinHandle<()>,
}

impl TestTargetServer {
    /// Spawn a new test server serving files from `volumes_root`.
    ///
    /// `/scalechecker` resolves `localhost:0`.
    pub async fn spawn(volumes_root: &Path) -> Result<Self, anyhow::Error> {
        Self::spawn_with_scale_host(volumes_root, "localhost:0").await
    }

    /// Spawn a new test server with a custom `/scalechecker` lookup host.
    pub async fn spawn_with_scale_host(
        volumes_root: &Path,
        scale_check_host: &str,
    ) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            ("BIND_HOST".to_string(), "127.0.0.1".to_string()),
            ("HTTP_PORT".to_string(), "0".to_string()),
            ("UDP_PORT".to_string(), "0".to_string()),
            (
                "VOLUMES_ROOT".to_string(),
                volumes_root.display().to_string(),
            ),
            ("SCALE_CHECK_HOST".to_string(), scale_check_host.to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let udp_socket = UdpSocket::bind(config.udp_bind_address())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind UDP listener: {}", e))?;
        let udp_addr = udp_socket
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get UDP address: {}", e))?;

        let listener = TcpListener::bind(config.http_bind_address())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;
        let http_addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let shutdown_token = CancellationToken::new();
        let (payload_tx, payload_rx) = watch::channel(String::new());
        let udp_handle = tokio::spawn(start_udp_listener(
            udp_socket,
            payload_tx,
            shutdown_token.child_token(),
        ));

        let state = AppState::new(config.clone(), payload_rx)
            .map_err(|e| anyhow::anyhow!("Failed to build state: {}", e))?;
        let app = routes::build_routes(Arc::new(state));

        let server_token = shutdown_token.child_token();
        let http_handle = tokio::spawn(async move {
            let server = axum::serve(listener, app)
                .with_graceful_shutdown(async move { server_token.cancelled().await });
            if let Err(e) = server.await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            http_addr,
            udp_addr,
            config,
            shutdown_token,
            _http_handle: http_handle,
            _udp_handle: udp_handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.http_addr)
    }

    /// Get the HTTP socket address.
    pub fn http_addr(&self) -> SocketAddr {
        self.http_addr
    }

    /// Get the UDP listener address.
    pub fn udp_addr(&self) -> SocketAddr {
        self.udp_addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestTargetServer {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
        self._http_handle.abort();
    }
}
