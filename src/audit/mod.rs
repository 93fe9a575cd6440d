//! Append-only audit logging.
//!
//! # Responsibilities
//! - Record every non-health inbound request before routing
//! - Record every completed upstream exchange
//! - Write records as JSON lines to a daily-rotated file
//!
//! # Design Decisions
//! - The audit stream is separate from operational `tracing` output; it is
//!   the compliance artifact, not diagnostics
//! - Appends are best-effort: a failed write never fails the request
//! - Rotation beyond the daily roll (compression, retention) is delegated
//!   to external tooling

use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;

/// One audit entry: either an inbound request seen before routing, or a
/// completed upstream exchange.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditRecord {
    RequestReceived {
        time: String,
        client_ip: String,
        method: String,
        url: String,
        pub_id: String,
        body: String,
    },
    ResponseSent {
        time: String,
        pub_id: String,
        target_url: String,
        status_code: u16,
        response_body: String,
    },
}

impl AuditRecord {
    /// Pre-routing record of an inbound request.
    pub fn request_received(
        client_ip: String,
        method: String,
        url: String,
        pub_id: String,
        body: &[u8],
    ) -> Self {
        Self::RequestReceived {
            time: timestamp(),
            client_ip,
            method,
            url,
            pub_id,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Record of one completed upstream exchange.
    pub fn response_sent(
        pub_id: String,
        target_url: String,
        status_code: u16,
        response_body: &[u8],
    ) -> Self {
        Self::ResponseSent {
            time: timestamp(),
            pub_id,
            target_url,
            status_code,
            response_body: String::from_utf8_lossy(response_body).into_owned(),
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Destination for audit records.
///
/// Implementations must be safe to call from concurrent request handlers
/// and must not block them beyond a buffered write.
pub trait AuditSink: Send + Sync {
    fn append(&self, record: &AuditRecord);
}

/// JSON-lines sink backed by a daily-rotated file.
pub struct RollingFileSink {
    writer: NonBlocking,
}

impl RollingFileSink {
    /// Open the sink, creating the log directory if needed.
    ///
    /// The returned [`WorkerGuard`] must be kept alive for the lifetime of
    /// the process so buffered records are flushed on exit.
    pub fn new(directory: &Path, file_prefix: &str) -> std::io::Result<(Self, WorkerGuard)> {
        std::fs::create_dir_all(directory)?;
        let appender = rolling::daily(directory, file_prefix);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        Ok((Self { writer }, guard))
    }
}

impl AuditSink for RollingFileSink {
    fn append(&self, record: &AuditRecord) {
        if let Ok(line) = serde_json::to_string(record) {
            let mut writer = self.writer.clone();
            let _ = writeln!(writer, "{line}");
        }
    }
}
