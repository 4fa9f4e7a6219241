//! Target Service
//!
//! Entry point for the service deployed by every compliance fixture.
//! Serves the HTTP probe surface and captures UDP datagrams.

use std::sync::Arc;
use target_service::config::Config;
use target_service::routes::{self, AppState};
use target_service::tasks::start_udp_listener;
use tokio::net::{TcpListener, UdpSocket};
use tokio::signal;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "target_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Target Service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        http_bind_address = %config.http_bind_address(),
        udp_bind_address = %config.udp_bind_address(),
        volumes_root = %config.volumes_root.display(),
        "Configuration loaded successfully"
    );

    let shutdown_token = CancellationToken::new();

    // Bind both sockets before spawning anything to fail fast on bind errors
    let udp_socket = UdpSocket::bind(config.udp_bind_address())
        .await
        .map_err(|e| {
            error!(error = %e, addr = %config.udp_bind_address(), "Failed to bind UDP listener");
            e
        })?;
    let listener = TcpListener::bind(config.http_bind_address())
        .await
        .map_err(|e| {
            error!(error = %e, addr = %config.http_bind_address(), "Failed to bind HTTP server");
            e
        })?;

    let (payload_tx, payload_rx) = watch::channel(String::new());
    let udp_token = shutdown_token.child_token();
    let udp_task = tokio::spawn(start_udp_listener(udp_socket, payload_tx, udp_token));
    info!(addr = %config.udp_bind_address(), "UDP listener started");

    let state = Arc::new(AppState::new(config, payload_rx)?);
    let app = routes::build_routes(state);

    info!(addr = %listener.local_addr()?, "Target Service listening");

    let server_token = shutdown_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            server_token.cancel();
        })
        .await?;

    // The server may also stop on its own; make sure the listener follows it.
    shutdown_token.cancel();
    if let Err(e) = udp_task.await {
        error!(error = %e, "UDP listener task failed");
    }

    info!("Target Service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
