//! HTTP server setup and the forwarding pipeline.
//!
//! # Responsibilities
//! - Create the Axum router with the two forwarding routes, the liveness
//!   probe, and the unsupported-endpoint fallback
//! - Wire up middleware (tracing, pre-routing audit capture)
//! - Authorize callers against the current allow-list snapshot
//! - Relay each authorized request to its fixed upstream, byte-exact
//! - Emit one exchange audit record per completed upstream exchange

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::audit::{AuditRecord, AuditSink};
use crate::auth::AuthStore;
use crate::config::{GatewayConfig, UpstreamConfig};
use crate::http::error::GatewayError;
use crate::http::middleware::request_audit;
use crate::http::{query_param, HEALTH_PATH};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthStore,
    pub audit: Arc<dyn AuditSink>,
    pub client: reqwest::Client,
    pub upstream: Arc<UpstreamConfig>,
    pub max_body_bytes: usize,
}

/// HTTP server for the forwarding gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &GatewayConfig, auth: AuthStore, audit: Arc<dyn AuditSink>) -> Self {
        let state = AppState {
            auth,
            audit,
            // Transport defaults only: no request timeout, no retries.
            client: reqwest::Client::new(),
            upstream: Arc::new(config.upstream.clone()),
            max_body_bytes: config.listener.max_body_bytes,
        };

        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health_handler))
            .route("/api/v1/rta/network", post(proxy_handler))
            .route("/api/v1/rta/report", post(proxy_handler))
            .fallback(unsupported_endpoint)
            .with_state(state.clone())
            .layer(middleware::from_fn_with_state(state, request_audit))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness probe: no authorization, no body read, no audit record.
async fn health_handler() -> &'static str {
    "OK"
}

async fn unsupported_endpoint() -> GatewayError {
    GatewayError::UnsupportedEndpoint
}

/// Validate, relay, and record exactly one upstream exchange.
async fn proxy_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, GatewayError> {
    // The literal "unknown" is the sentinel the audit layer writes for an
    // absent id, so it is rejected the same way as a missing one.
    let pub_id = match query_param(request.uri(), "pub_id") {
        Some(id) if id != "unknown" => id,
        _ => return Err(GatewayError::MissingPubId),
    };

    if !state.auth.current().is_authorized(&pub_id) {
        tracing::debug!(pub_id = %pub_id, "Rejected unrecognized pub_id");
        return Err(GatewayError::InvalidPubId);
    }

    let target = state
        .upstream
        .target_for(request.uri().path())
        .ok_or(GatewayError::UnsupportedEndpoint)?
        .to_string();

    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|_| GatewayError::ReadBody)?;

    // Copy inbound headers verbatim except Host, which must name the
    // upstream; the client derives it from the target URL.
    let mut headers = parts.headers.clone();
    headers.remove(header::HOST);

    let upstream_request = state
        .client
        .post(&target)
        .headers(headers)
        .body(body)
        .build()
        .map_err(|e| {
            tracing::error!(target = %target, error = %e, "Failed to build upstream request");
            GatewayError::UpstreamRequest
        })?;

    // Single attempt. Dropping this future (client disconnect) cancels the
    // in-flight upstream call.
    let upstream_response = state.client.execute(upstream_request).await.map_err(|e| {
        tracing::error!(target = %target, error = %e, "Upstream request failed");
        GatewayError::UpstreamDispatch
    })?;

    let status = upstream_response.status();
    let response_headers = upstream_response.headers().clone();
    let response_body = upstream_response.bytes().await.map_err(|e| {
        tracing::error!(target = %target, error = %e, "Failed to read upstream response body");
        GatewayError::UpstreamBody
    })?;

    state.audit.append(&AuditRecord::response_sent(
        pub_id,
        target,
        status.as_u16(),
        &response_body,
    ));

    Ok(relay_response(status, response_headers, response_body))
}

/// Rebuild the upstream response verbatim: status, headers, and body bytes
/// unchanged. Transport framing is managed by the server itself.
fn relay_response(status: StatusCode, headers: HeaderMap, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
