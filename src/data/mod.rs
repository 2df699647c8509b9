//! Core data models for the listing proxy
//!
//! Records are kept exactly as the upstream delivers them; the proxy only
//! reads the fields it filters on.

pub mod webflow;

pub use webflow::{WebflowClient, WebflowError};

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

/// A single upstream record (the item's `fieldData` object)
pub type Record = Map<String, Value>;

/// Full in-memory copy of the upstream collection
///
/// Cloning is cheap; the records are shared.
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    /// When the snapshot was fetched
    pub fetched_at: DateTime<Utc>,
    /// All records, in upstream order
    pub items: Arc<Vec<Record>>,
}

impl CachedSnapshot {
    /// Creates a snapshot stamped with the current time
    pub fn new(items: Vec<Record>) -> Self {
        Self::fetched_at(items, Utc::now())
    }

    /// Creates a snapshot with an explicit fetch time
    pub fn fetched_at(items: Vec<Record>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            items: Arc::new(items),
        }
    }

    /// Whether the snapshot is younger than `ttl` at `now`
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.fetched_at < ttl
    }
}
