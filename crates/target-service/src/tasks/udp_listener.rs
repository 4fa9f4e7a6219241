//! UDP capture background task.
//!
//! Reads datagrams one at a time and publishes the `request` field of each
//! into a watch channel. The channel only ever holds the latest value, which
//! is all `/udp` reports.
//!
//! # Graceful Shutdown
//!
//! The task exits when its cancellation token is cancelled. A malformed
//! datagram is logged and dropped; it never stops the loop.

use common::types::UdpRequest;
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Largest datagram the listener reads; longer payloads are truncated.
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Decode a datagram payload into its request string.
pub fn decode_datagram(payload: &[u8]) -> Result<String, serde_json::Error> {
    serde_json::from_slice::<UdpRequest>(payload).map(|r| r.request)
}

/// Run the UDP listener loop on an already-bound socket.
///
/// Every decoded request replaces the value in `payload_tx`. Exits when
/// `cancel_token` is cancelled.
pub async fn start_udp_listener(
    socket: UdpSocket,
    payload_tx: watch::Sender<String>,
    cancel_token: CancellationToken,
) {
    let mut buf = [0u8; MAX_DATAGRAM_SIZE];

    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => {
                match received {
                    Ok((len, peer)) => {
                        let payload = buf.get(..len).unwrap_or_default();
                        match decode_datagram(payload) {
                            Ok(request) => {
                                debug!(%peer, bytes = len, "Captured UDP payload");
                                payload_tx.send_replace(request);
                            }
                            Err(e) => {
                                warn!(%peer, error = %e, "Dropping undecodable UDP datagram");
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "UDP receive failed");
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!("UDP listener received shutdown signal, exiting");
                break;
            }
        }
    }
}
