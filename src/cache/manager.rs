//! In-memory snapshot store
//!
//! Snapshots are cloned out on read; a write swaps the whole entry under the
//! lock, so readers observe either the previous or the new snapshot.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::SnapshotCache;
use crate::data::CachedSnapshot;

/// Process-wide snapshot store backed by a locked map
#[derive(Debug, Default)]
pub struct CacheManager {
    entries: RwLock<HashMap<String, CachedSnapshot>>,
}

impl CacheManager {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no snapshot is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotCache for CacheManager {
    fn get(&self, key: &str) -> Option<CachedSnapshot> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, snapshot: CachedSnapshot) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), snapshot);
    }

    fn expire(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
