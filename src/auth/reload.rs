//! Allow-list loading and periodic reload.
//!
//! The document is a JSON file of the form:
//!
//! ```json
//! { "valid_pub_ids": ["NovaBeyond", "ByteMedia"] }
//! ```
//!
//! The first load happens at startup via [`startup_snapshot`], which falls
//! back to the built-in default list on any failure so the service never
//! starts with an empty permission set. Subsequent loads are driven by
//! [`ReloadTask`] on a fixed interval; a failed reload keeps the previously
//! published snapshot in effect and never falls back to the default.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::time;

use crate::auth::snapshot::AuthSnapshot;
use crate::auth::store::AuthStore;

/// On-disk shape of the allow-list document.
#[derive(Debug, Deserialize)]
struct AllowlistDocument {
    valid_pub_ids: Vec<String>,
}

/// Error type for allow-list loading.
///
/// Unreadable and malformed documents are handled identically everywhere,
/// but the source of the failure is kept for logging.
#[derive(Debug, thiserror::Error)]
pub enum AllowlistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read and parse the allow-list document into a fresh snapshot.
pub fn load_allowlist(path: &Path) -> Result<AuthSnapshot, AllowlistError> {
    let file = File::open(path)?;
    let document: AllowlistDocument = serde_json::from_reader(BufReader::new(file))?;
    Ok(AuthSnapshot::new(document.valid_pub_ids))
}

/// First load at process startup.
///
/// Any failure yields the built-in default allow list; this is the only
/// place the default fallback exists.
pub fn startup_snapshot(path: &Path) -> AuthSnapshot {
    match load_allowlist(path) {
        Ok(snapshot) => {
            tracing::info!(path = %path.display(), ids = snapshot.ids().len(), "Allow list loaded");
            snapshot
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to load allow list, using default"
            );
            AuthSnapshot::default_allowlist()
        }
    }
}

/// Timer-driven allow-list reloader.
///
/// Runs for the lifetime of the process, publishing a new snapshot into the
/// shared [`AuthStore`] after each successful read of the document.
pub struct ReloadTask {
    store: AuthStore,
    path: PathBuf,
    interval: Duration,
}

impl ReloadTask {
    pub fn new(store: AuthStore, path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            store,
            path: path.into(),
            interval,
        }
    }

    /// Run the reload loop until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            path = %self.path.display(),
            interval_secs = self.interval.as_secs(),
            "Allow-list reload task starting"
        );

        let mut ticker = time::interval(self.interval);
        // The first tick completes immediately; the startup load already
        // happened, so skip it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.reload();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Allow-list reload task received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One reload cycle. Failure keeps the current snapshot.
    fn reload(&self) {
        match load_allowlist(&self.path) {
            Ok(snapshot) => {
                let count = snapshot.ids().len();
                self.store.publish(snapshot);
                tracing::info!(ids = count, "Allow list reloaded");
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Allow-list reload failed, keeping current snapshot"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_allowlist(ids: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let doc = serde_json::json!({ "valid_pub_ids": ids });
        file.write_all(doc.to_string().as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_ids_from_document() {
        let file = write_allowlist(&["one", "two"]);
        let snapshot = load_allowlist(file.path()).unwrap();
        assert!(snapshot.is_authorized("one"));
        assert!(snapshot.is_authorized("two"));
        assert!(!snapshot.is_authorized("three"));
    }

    #[test]
    fn missing_document_is_an_io_error() {
        let err = load_allowlist(Path::new("/nonexistent/allowlist.json")).unwrap_err();
        assert!(matches!(err, AllowlistError::Io(_)));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = load_allowlist(file.path()).unwrap_err();
        assert!(matches!(err, AllowlistError::Parse(_)));
    }

    #[test]
    fn startup_falls_back_to_default_on_failure() {
        let snapshot = startup_snapshot(Path::new("/nonexistent/allowlist.json"));
        assert!(snapshot.is_authorized("NovaBeyond"));
        assert!(snapshot.is_authorized("PinkTomato"));
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let store = AuthStore::new(AuthSnapshot::new(vec!["kept".into()]));
        let task = ReloadTask::new(
            store.clone(),
            "/nonexistent/allowlist.json",
            Duration::from_secs(60),
        );

        task.reload();

        // No fallback to default mid-run: the prior snapshot stays published.
        let current = store.current();
        assert!(current.is_authorized("kept"));
        assert!(!current.is_authorized("NovaBeyond"));
    }

    #[test]
    fn successful_reload_publishes_new_snapshot() {
        let store = AuthStore::new(AuthSnapshot::new(vec!["old".into()]));
        let file = write_allowlist(&["new"]);
        let task = ReloadTask::new(store.clone(), file.path(), Duration::from_secs(60));

        task.reload();

        let current = store.current();
        assert!(current.is_authorized("new"));
        assert!(!current.is_authorized("old"));
    }
}
