//! Error-to-response mapping.
//!
//! Every client- and upstream-facing failure is converted at the pipeline
//! boundary into a JSON body `{"error": <message>}` with the appropriate
//! status code. No internal detail leaks into responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Terminal failures of one proxied exchange.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// `pub_id` query parameter absent or empty.
    #[error("missing pub_id")]
    MissingPubId,

    /// `pub_id` present but not in the current allow list.
    #[error("invalid pub_id")]
    InvalidPubId,

    /// Path outside the two supported routes.
    #[error("unsupported endpoint")]
    UnsupportedEndpoint,

    /// Inbound body could not be read.
    #[error("failed to read body")]
    ReadBody,

    /// Upstream request could not be constructed.
    #[error("rta request failed")]
    UpstreamRequest,

    /// Upstream call failed at the transport level.
    #[error("rta request failed")]
    UpstreamDispatch,

    /// Upstream responded but its body could not be read.
    #[error("failed to read response body")]
    UpstreamBody,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingPubId | Self::InvalidPubId | Self::UnsupportedEndpoint | Self::ReadBody => {
                StatusCode::BAD_REQUEST
            }
            Self::UpstreamRequest => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamDispatch | Self::UpstreamBody => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
