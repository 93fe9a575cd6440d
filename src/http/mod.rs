//! HTTP surface of the gateway.
//!
//! # Request Flow
//! ```text
//! inbound request
//!     → TraceLayer (operational tracing)
//!     → middleware.rs (pre-routing audit capture, /hc exempt)
//!     → server.rs routing:
//!         GET  /hc                  → constant 200 "OK"
//!         POST /api/v1/rta/network  → proxy handler
//!         POST /api/v1/rta/report   → proxy handler
//!         anything else             → 400 unsupported endpoint
//!     → error.rs maps every failure to a JSON error response
//! ```

pub mod error;
pub mod middleware;
pub mod server;

pub use error::GatewayError;
pub use server::HttpServer;

/// Liveness route, exempt from authorization and audit logging.
pub const HEALTH_PATH: &str = "/hc";

/// Extract a non-empty query parameter from a request URI.
pub(crate) fn query_param(uri: &axum::http::Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn query_param_extracts_value() {
        let uri: Uri = "/api/v1/rta/network?pub_id=NovaBeyond&other=1".parse().unwrap();
        assert_eq!(query_param(&uri, "pub_id").as_deref(), Some("NovaBeyond"));
        assert_eq!(query_param(&uri, "other").as_deref(), Some("1"));
    }

    #[test]
    fn query_param_treats_empty_as_absent() {
        let uri: Uri = "/api/v1/rta/network?pub_id=".parse().unwrap();
        assert_eq!(query_param(&uri, "pub_id"), None);
    }

    #[test]
    fn query_param_handles_missing_query() {
        let uri: Uri = "/api/v1/rta/network".parse().unwrap();
        assert_eq!(query_param(&uri, "pub_id"), None);
    }

    #[test]
    fn query_param_decodes_percent_encoding() {
        let uri: Uri = "/x?pub_id=a%20b".parse().unwrap();
        assert_eq!(query_param(&uri, "pub_id").as_deref(), Some("a b"));
    }
}
