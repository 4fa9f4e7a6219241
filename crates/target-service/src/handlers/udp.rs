//! Readback of the UDP listener's capture.

use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use common::types::ServiceResponse;
use std::sync::Arc;

/// Handle `GET /udp`.
///
/// Returns the most recently captured datagram request, or an empty string
/// if nothing has arrived yet. Reading never clears the value.
pub async fn last_udp_payload(State(state): State<Arc<AppState>>) -> Json<ServiceResponse> {
    let payload = state.udp_payload.borrow().clone();
    Json(ServiceResponse::new(payload))
}
