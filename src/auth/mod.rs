//! Publisher authorization subsystem.
//!
//! # Data Flow
//! ```text
//! allow-list document (JSON)
//!     → reload.rs (read & parse, on a fixed interval)
//!     → AuthSnapshot (id list + membership index, built together)
//!     → store.rs (single atomic swap of Arc<AuthSnapshot>)
//!     → request handlers read via AuthStore::current()
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable once built; a reload publishes a whole new
//!   snapshot, it never mutates the current one
//! - Reads are lock-free (`ArcSwap::load_full`) and safe concurrently with
//!   an in-flight reload; readers holding a superseded snapshot keep it
//!   alive until they drop it
//! - First-load failure falls back to the built-in default allow list;
//!   later reload failures keep the previously published snapshot

pub mod reload;
pub mod snapshot;
pub mod store;

pub use reload::{load_allowlist, startup_snapshot, AllowlistError, ReloadTask};
pub use snapshot::AuthSnapshot;
pub use store::AuthStore;
