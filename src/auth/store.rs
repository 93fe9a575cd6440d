//! Shared slot holding the current allow-list snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::auth::snapshot::AuthSnapshot;

/// Process-wide handle to the current [`AuthSnapshot`].
///
/// Cloned into every request handler and into the reload task; all clones
/// observe the same slot. Reads are lock-free and never block a publish;
/// a publish is a single atomic pointer swap.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<ArcSwap<AuthSnapshot>>,
}

impl AuthStore {
    /// Create a store holding the given initial snapshot.
    pub fn new(initial: AuthSnapshot) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// The currently published snapshot.
    ///
    /// Safe to call concurrently with an in-flight [`publish`](Self::publish);
    /// the caller gets either the previous or the new fully-built snapshot.
    pub fn current(&self) -> Arc<AuthSnapshot> {
        self.inner.load_full()
    }

    /// Atomically replace the published snapshot.
    ///
    /// Readers still holding the previous snapshot are unaffected; it is
    /// reclaimed once the last of them drops its `Arc`.
    pub fn publish(&self, snapshot: AuthSnapshot) {
        self.inner.store(Arc::new(snapshot));
    }
}
