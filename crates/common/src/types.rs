//! Wire types for the target service contract.

use serde::{Deserialize, Serialize};

/// Default HTTP port of the target service.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default port of the target service's UDP listener.
pub const DEFAULT_UDP_PORT: u16 = 10001;

/// Reply to `/ping` when no address is given.
pub const LOCAL_PONG: &str = "PONG FROM TARGET";

/// Reply body for a `/ping` whose address could not be reached.
///
/// The address is echoed verbatim so callers can assert on it.
#[must_use]
pub fn unreachable_message(address: &str) -> String {
    format!("Could not reach address: {address}")
}

/// Envelope for every structured target service reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub response: String,
}

impl ServiceResponse {
    /// Wrap a reply text.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// Datagram payload accepted by the UDP listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdpRequest {
    pub request: String,
}

impl UdpRequest {
    /// Wrap a request string.
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_service_response_wire_shape() {
        let json = serde_json::to_string(&ServiceResponse::new("MYVOLUME")).unwrap();
        assert_eq!(json, r#"{"response":"MYVOLUME"}"#);
    }

    #[test]
    fn test_service_response_accepts_trailing_newline() {
        // Some target implementations terminate JSON bodies with a newline.
        let parsed: ServiceResponse = serde_json::from_str("{\"response\":\"3\"}\n").unwrap();
        assert_eq!(parsed.response, "3");
    }

    #[test]
    fn test_udp_request_wire_shape() {
        let parsed: UdpRequest = serde_json::from_str(r#"{"request":"myUdpvalue"}"#).unwrap();
        assert_eq!(parsed, UdpRequest::new("myUdpvalue"));
    }

    #[test]
    fn test_unreachable_message_echoes_address() {
        assert_eq!(
            unreachable_message("notatarget:8080/ping"),
            "Could not reach address: notatarget:8080/ping"
        );
    }
}
