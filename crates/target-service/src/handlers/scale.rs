//! Replica count report.
//!
//! Compose tools give every replica of a scaled service its own address under
//! the service's DNS name, so the number of distinct IPs the name resolves to
//! is the number of running replicas.

use crate::errors::TargetError;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use common::types::ServiceResponse;
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Handle `GET /scalechecker`.
#[instrument(name = "target.scalechecker", skip_all, fields(host = %state.config.scale_check_host))]
pub async fn scale_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServiceResponse>, TargetError> {
    let replicas = count_replicas(&state.config.scale_check_host).await?;
    Ok(Json(ServiceResponse::new(replicas.to_string())))
}

/// Count the distinct IPs `host` (in `name:port` form) resolves to.
pub async fn count_replicas(host: &str) -> Result<usize, TargetError> {
    let addrs = tokio::net::lookup_host(host).await.map_err(|e| {
        warn!(error = %e, host, "Replica lookup failed");
        TargetError::Lookup(format!("{}: {}", host, e))
    })?;

    Ok(distinct_ips(addrs))
}

/// Number of distinct IPs among resolved addresses; ports are ignored.
pub fn distinct_ips(addrs: impl IntoIterator<Item = SocketAddr>) -> usize {
    addrs
        .into_iter()
        .map(|addr| addr.ip())
        .collect::<HashSet<IpAddr>>()
        .len()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_count_replicas_of_literal_ip() {
        let count = count_replicas("127.0.0.1:8080").await.unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_distinct_ips_counts_each_replica_once() {
        let addrs: Vec<SocketAddr> = [
            "172.18.0.3:8080",
            "172.18.0.4:8080",
            "172.18.0.5:8080",
            "172.18.0.4:8080",
        ]
        .iter()
        .map(|a| a.parse().unwrap())
        .collect();

        assert_eq!(distinct_ips(addrs), 3);
    }

    #[test]
    fn test_distinct_ips_ignores_port() {
        let addrs: Vec<SocketAddr> = ["10.0.0.2:8080", "10.0.0.2:9090"]
            .iter()
            .map(|a| a.parse().unwrap())
            .collect();

        assert_eq!(distinct_ips(addrs), 1);
    }

    #[test]
    fn test_distinct_ips_of_nothing_is_zero() {
        assert_eq!(distinct_ips(Vec::new()), 0);
    }

    #[tokio::test]
    async fn test_count_replicas_requires_port() {
        let result = count_replicas("target").await;
        assert!(matches!(result, Err(TargetError::Lookup(_))));
    }
}
