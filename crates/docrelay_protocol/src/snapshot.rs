//! Client snapshots for delta-sync.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One entry of a client's snapshot: the id of a document the client holds
/// and the `updated` stamp it last saw for it. Payload fields are never
/// sent; the snapshot is discarded after the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Last-seen `updated` stamp; 0 when the client never saw one.
    #[serde(default)]
    pub updated: i64,
}

impl SnapshotEntry {
    /// Creates a snapshot entry.
    pub fn new(id: impl Into<String>, updated: i64) -> Self {
        Self {
            id: id.into(),
            updated,
        }
    }
}

/// Returns the set of ids the client claims to hold. Duplicate ids in the
/// snapshot collapse into one.
pub fn known_ids(snapshot: &[SnapshotEntry]) -> HashSet<&str> {
    snapshot.iter().map(|entry| entry.id.as_str()).collect()
}

/// Returns the watermark: the maximum `updated` stamp across the snapshot,
/// or 0 for an empty snapshot.
pub fn watermark(snapshot: &[SnapshotEntry]) -> i64 {
    snapshot.iter().map(|entry| entry.updated).max().unwrap_or(0)
}
