//! Reachability probe.
//!
//! `GET /ping` answers locally when no address is given. With an address it
//! acts as a relay: the service fetches `http://<address>` from inside the
//! deployed network and hands the remote body back untouched, which lets the
//! harness observe which services can see each other.

use crate::routes::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::{unreachable_message, ServiceResponse, LOCAL_PONG};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Debug, Deserialize)]
pub struct PingQuery {
    #[serde(default)]
    pub address: String,
}

/// Handle `GET /ping?address=<host:port/path>`.
///
/// An unreachable address is an expected outcome, not a server fault: the
/// reply is a structured message naming the address with a 400 status.
#[instrument(name = "target.ping", skip_all, fields(address = %query.address))]
pub async fn ping(State(state): State<Arc<AppState>>, Query(query): Query<PingQuery>) -> Response {
    if query.address.is_empty() {
        return Json(ServiceResponse::new(LOCAL_PONG)).into_response();
    }

    let url = format!("http://{}", query.address);
    let remote = match state.http_client.get(&url).send().await {
        Ok(remote) => remote,
        Err(e) => {
            warn!(error = %e, "Ping target unreachable");
            return (
                StatusCode::BAD_REQUEST,
                Json(ServiceResponse::new(unreachable_message(&query.address))),
            )
                .into_response();
        }
    };

    match remote.text().await {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to read ping target body");
            (
                StatusCode::BAD_REQUEST,
                Json(ServiceResponse::new(format!(
                    "Could not read body from response: {}",
                    e
                ))),
            )
                .into_response()
        }
    }
}
