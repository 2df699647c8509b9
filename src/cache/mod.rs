//! Cache module for holding upstream snapshots in process memory
//!
//! The handler talks to the [`SnapshotCache`] trait so tests can swap in
//! their own store. [`CacheManager`] is the in-memory implementation used by
//! the server. Freshness is decided by the caller against the current TTL,
//! so a changed TTL applies to snapshots already stored.

mod manager;

pub use manager::CacheManager;

use crate::data::CachedSnapshot;

/// Keyed storage for collection snapshots
pub trait SnapshotCache: Send + Sync {
    /// Returns the snapshot stored under `key`, fresh or not
    fn get(&self, key: &str) -> Option<CachedSnapshot>;

    /// Stores `snapshot` under `key`, replacing any previous one
    fn set(&self, key: &str, snapshot: CachedSnapshot);

    /// Drops the snapshot stored under `key`
    fn expire(&self, key: &str);
}
