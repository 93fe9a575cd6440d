//! Pre-routing audit capture.
//!
//! Runs before route dispatch and records every inbound request except the
//! liveness probe: client address, method, full URL, claimed `pub_id` (or
//! "unknown"), and raw body. Requests later rejected by the proxy handler
//! are still recorded here, which is what gives the audit trail visibility
//! into rejected traffic.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::audit::AuditRecord;
use crate::http::error::GatewayError;
use crate::http::server::AppState;
use crate::http::{query_param, HEALTH_PATH};

pub async fn request_audit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    // The liveness probe short-circuits the audit stage entirely.
    if request.uri().path() == HEALTH_PATH {
        return next.run(request).await;
    }

    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let method = request.method().to_string();
    let url = request.uri().to_string();
    let pub_id = query_param(request.uri(), "pub_id").unwrap_or_else(|| "unknown".to_string());

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(_) => return GatewayError::ReadBody.into_response(),
    };

    state
        .audit
        .append(&AuditRecord::request_received(client_ip, method, url, pub_id, &bytes));

    // Reinstate the body so the handler reads the identical bytes.
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
