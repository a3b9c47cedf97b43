//! Delta-sync resolution.
//!
//! One round trip reconciles a client's possibly-stale copy of a collection
//! with the server: the client sends the ids it holds and the newest
//! `updated` stamp it has seen, and receives every document it is missing
//! or holds stale. No per-record version vectors, at the price of a full
//! collection scan per call.

use docrelay_core::{Collection, Document};
use docrelay_protocol::{known_ids, watermark, SnapshotEntry};

/// Computes the documents the client is missing or holds a stale copy of.
///
/// A document is returned when its id is absent from the snapshot, or when
/// its `updated` stamp is strictly newer than the snapshot's watermark.
/// Duplicate snapshot ids collapse before the id check; an empty snapshot
/// returns the whole collection.
pub fn difference(collection: &Collection, snapshot: &[SnapshotEntry]) -> Vec<Document> {
    let known = known_ids(snapshot);
    let mark = watermark(snapshot);

    collection
        .scan()
        .into_iter()
        .filter(|doc| {
            let unknown = doc.id().map_or(true, |id| !known.contains(id));
            unknown || doc.updated() > mark
        })
        .collect()
}
