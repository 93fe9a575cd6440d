//! Static gateway configuration.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → GatewayConfig (immutable)
//!     → shared with all subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Every section has defaults so a minimal (or absent) file works
//! - The publisher allow list is NOT part of this config: it lives in its
//!   own document and is hot-reloaded by the `auth` module
//! - Changes to this config require a restart

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AllowlistConfig, AuditConfig, GatewayConfig, ListenerConfig, ObservabilityConfig,
    UpstreamConfig,
};
