//! Immutable allow-list snapshots.

use std::collections::HashSet;

/// Publisher IDs used when the allow-list document cannot be read at startup.
pub const DEFAULT_PUB_IDS: [&str; 4] = ["NovaBeyond", "ByteMedia", "FlyFunAds", "PinkTomato"];

/// An immutable view of the publisher allow list.
///
/// The membership index is derived from the id list in the constructor, so
/// the two can never disagree on a published snapshot.
#[derive(Debug)]
pub struct AuthSnapshot {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl AuthSnapshot {
    /// Build a snapshot from a list of publisher IDs.
    pub fn new(ids: Vec<String>) -> Self {
        let index = ids.iter().cloned().collect();
        Self { ids, index }
    }

    /// The built-in fallback allow list.
    pub fn default_allowlist() -> Self {
        Self::new(DEFAULT_PUB_IDS.iter().map(|id| id.to_string()).collect())
    }

    /// Exact, case-sensitive membership check. No normalization.
    pub fn is_authorized(&self, pub_id: &str) -> bool {
        self.index.contains(pub_id)
    }

    /// The publisher IDs this snapshot was built from, in document order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
