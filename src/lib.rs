//! RTA Forwarding Gateway Library
//!
//! A transparent HTTP forwarding gateway built with Tokio and Axum. Inbound
//! POST requests on two fixed routes are authorized against a hot-reloadable
//! publisher allow list, relayed byte-for-byte to a fixed upstream endpoint,
//! and recorded in an append-only audit log.

pub mod audit;
pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;

pub use audit::{AuditRecord, AuditSink, RollingFileSink};
pub use auth::{AuthSnapshot, AuthStore, ReloadTask};
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
