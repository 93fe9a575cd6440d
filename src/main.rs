//! RTA Forwarding Gateway
//!
//! A transparent forwarding gateway built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                RTA GATEWAY                    │
//!                    │                                               │
//!   Client Request   │  ┌──────────┐   ┌─────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│  audit   │──▶│ routing │──▶│ forward-  │──┼──▶ Upstream
//!                    │  │middleware│   │ (axum)  │   │ ing       │  │    (network /
//!   Client Response  │  └──────────┘   └─────────┘   │ pipeline  │  │     report)
//!   ◀────────────────┼────────────────────────────── └───────────┘  │
//!                    │                                               │
//!                    │  ┌─────────────────────────────────────────┐  │
//!                    │  │          Cross-Cutting Concerns          │  │
//!                    │  │  ┌────────┐ ┌───────────┐ ┌───────────┐  │  │
//!                    │  │  │ config │ │ allow-list│ │ audit log │  │  │
//!                    │  │  │ (TOML) │ │ hot reload│ │ (rolling) │  │  │
//!                    │  │  └────────┘ └───────────┘ └───────────┘  │  │
//!                    │  └─────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rta_gateway::auth::{startup_snapshot, AuthStore, ReloadTask};
use rta_gateway::{GatewayConfig, HttpServer, RollingFileSink, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "rta-gateway", about = "Transparent RTA forwarding gateway")]
struct Cli {
    /// Path to the gateway configuration file.
    #[arg(long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration first; its log level seeds the default filter.
    let config = load_or_default(&cli.config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rta_gateway={},tower_http=warn", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        network_url = %config.upstream.network_url,
        report_url = %config.upstream.report_url,
        allowlist = %config.allowlist.path,
        "Configuration loaded"
    );

    // Audit sink; the guard must outlive the server so buffered records flush.
    let (audit, _audit_guard) = RollingFileSink::new(
        Path::new(&config.audit.directory),
        &config.audit.file_prefix,
    )?;
    let audit = Arc::new(audit);

    // First allow-list load, with the built-in default as fallback.
    let auth = AuthStore::new(startup_snapshot(Path::new(&config.allowlist.path)));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    // Periodic reload runs for the lifetime of the process.
    let reload = ReloadTask::new(
        auth.clone(),
        config.allowlist.path.clone(),
        Duration::from_secs(config.allowlist.reload_interval_secs),
    );
    tokio::spawn(reload.run(shutdown.subscribe()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(&config, auth, audit);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Load the gateway config, falling back to defaults if the file is absent
/// or malformed. Uses eprintln because tracing is not initialized yet.
fn load_or_default(path: &Path) -> GatewayConfig {
    match rta_gateway::config::load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "failed to load config from {}: {e}; using defaults",
                path.display()
            );
            GatewayConfig::default()
        }
    }
}
