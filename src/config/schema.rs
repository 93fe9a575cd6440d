//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Defaults match the production deployment.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body cap).
    pub listener: ListenerConfig,

    /// Fixed upstream endpoints the two routes forward to.
    pub upstream: UpstreamConfig,

    /// Publisher allow-list source and reload cadence.
    pub allowlist: AllowlistConfig,

    /// Audit log sink settings.
    pub audit: AuditConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum inbound/upstream body size buffered in memory, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Fixed upstream endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Target for `POST /api/v1/rta/network`.
    pub network_url: String,

    /// Target for `POST /api/v1/rta/report`.
    pub report_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            network_url: "https://growth-rta.tiktokv-us.com/api/v1/rta/network".to_string(),
            report_url: "https://growth-rta.tiktokv-us.com/api/v1/rta/report".to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Map an inbound route path to its upstream URL.
    ///
    /// Returns `None` for any path outside the two supported routes.
    pub fn target_for(&self, path: &str) -> Option<&str> {
        match path {
            "/api/v1/rta/network" => Some(&self.network_url),
            "/api/v1/rta/report" => Some(&self.report_url),
            _ => None,
        }
    }
}

/// Publisher allow-list source settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AllowlistConfig {
    /// Path to the JSON allow-list document.
    pub path: String,

    /// Reload polling interval in seconds.
    pub reload_interval_secs: u64,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            path: "allowlist.json".to_string(),
            reload_interval_secs: 60,
        }
    }
}

/// Audit log sink settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Directory the rotated audit files are written into.
    pub directory: String,

    /// File name prefix for the rotated audit files.
    pub file_prefix: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            directory: "./logs".to_string(),
            file_prefix: "api.log".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
