//! Target service client fixture.
//!
//! Verification callbacks observe a deployment only through this client: HTTP
//! GETs against the target service's probe endpoints and raw UDP sends to its
//! listener. HTTP status codes are not asserted; the body carries the outcome.

use crate::config::HarnessConfig;
use crate::errors::HarnessError;
use crate::eventual::{assert_eventually, ConsistencyCategory};
use common::types::{ServiceResponse, UdpRequest};
use reqwest::Client;
use tokio::net::UdpSocket;
use tracing::debug;

/// Client for probing a deployed target service.
#[derive(Debug, Clone)]
pub struct TargetClient {
    base_url: String,
    udp_addr: String,
    http_client: Client,
}

impl TargetClient {
    /// Create a client for the service at `base_url` with its UDP listener at `udp_addr`.
    pub fn new(base_url: impl Into<String>, udp_addr: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            udp_addr: udp_addr.into(),
            http_client: Client::new(),
        }
    }

    /// Create a client for the target configured in `config`.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(&config.target_http_url, &config.target_udp_addr)
    }

    /// Get the base URL of the target service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query` and return the raw body, whatever the status.
    pub async fn get_body(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, HarnessError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http_client.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%url, %status, %body, "Target responded");
        Ok(body)
    }

    /// GET `path` and unwrap the `response` field of the JSON envelope.
    pub async fn get_response(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, HarnessError> {
        let body = self.get_body(path, query).await?;
        let envelope: ServiceResponse = serde_json::from_str(&body)?;
        Ok(envelope.response)
    }

    /// Probe reachability; with an address the target relays the probe there.
    pub async fn ping(&self, address: Option<&str>) -> Result<String, HarnessError> {
        match address {
            Some(address) => self.get_response("/ping", &[("address", address)]).await,
            None => self.get_response("/ping", &[]).await,
        }
    }

    /// Contents of a file mounted under the target's volumes root.
    pub async fn volume_file(&self, filename: &str) -> Result<String, HarnessError> {
        self.get_response("/volumefile", &[("filename", filename)])
            .await
    }

    /// Last datagram request captured by the target.
    pub async fn last_udp_payload(&self) -> Result<String, HarnessError> {
        self.get_response("/udp", &[]).await
    }

    /// Replica count reported by `/scalechecker`.
    pub async fn scale_report(&self) -> Result<String, HarnessError> {
        self.get_response("/scalechecker", &[]).await
    }

    /// Send `{"request": value}` to the target's UDP listener. No reply is expected.
    pub async fn send_udp(&self, value: &str) -> Result<(), HarnessError> {
        let udp_err = |source| HarnessError::Udp {
            addr: self.udp_addr.clone(),
            source,
        };

        let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(udp_err)?;
        socket.connect(&self.udp_addr).await.map_err(udp_err)?;

        let payload = serde_json::to_vec(&UdpRequest::new(value))?;
        socket.send(&payload).await.map_err(udp_err)?;
        Ok(())
    }

    /// Wait until the target answers a local ping.
    pub async fn wait_until_ready(&self) -> Result<(), HarnessError> {
        let client = self;
        assert_eventually(ConsistencyCategory::ServiceStartup, move || async move {
            client.ping(None).await.is_ok()
        })
        .await
        .map_err(|e| HarnessError::NotReady(format!("{}: {}", self.base_url, e)))
    }

    /// Poll a relayed ping until it reports `expected`, then return what it reports.
    ///
    /// The entry service can be up before the service it relays to is
    /// listening, so a single probe right after `up` is not conclusive.
    pub async fn wait_for_ping(&self, address: &str, expected: &str) -> Result<String, HarnessError> {
        let client = self;
        let _ = assert_eventually(ConsistencyCategory::ServiceStartup, move || async move {
            matches!(client.ping(Some(address)).await, Ok(value) if value == expected)
        })
        .await;

        self.ping(Some(address)).await
    }

    /// Poll `/scalechecker` until it reports `expected` replicas.
    pub async fn wait_for_scale_report(&self, expected: &str) -> Result<String, HarnessError> {
        let client = self;
        let _ = assert_eventually(ConsistencyCategory::ServiceStartup, move || async move {
            matches!(client.scale_report().await, Ok(value) if value == expected)
        })
        .await;

        self.scale_report().await
    }

    /// Poll `/udp` until it reports `expected`, then return what it reports.
    ///
    /// Times out silently: the returned value is whatever was last captured,
    /// so the caller's comparison produces the diagnostic.
    pub async fn wait_for_udp_payload(&self, expected: &str) -> Result<String, HarnessError> {
        let client = self;
        let _ = assert_eventually(ConsistencyCategory::DatagramDelivery, move || async move {
            matches!(client.last_udp_payload().await, Ok(value) if value == expected)
        })
        .await;

        self.last_udp_payload().await
    }
}
