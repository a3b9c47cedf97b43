//! The generic database operation envelope.

use crate::snapshot::SnapshotEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A client-specified database operation.
///
/// One envelope shape covers every method; which parameter fields must be
/// present depends on the method, and the dispatcher rejects calls whose
/// required parameters are missing. The `method` field stays a raw string
/// here so an unknown name reaches the dispatcher and fails closed with a
/// proper error instead of failing JSON deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbRequest {
    /// Target collection name.
    pub collection: String,
    /// Wire method name (see `Method`).
    pub method: String,
    /// Equality filter for `find`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// Find options (sort, skip, limit) for `find`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Document id for `findOne`, `updateOne` and `deleteOne`.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Document payload for `insertOne` and `updateOne`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
    /// Document payloads for `insertMany` and `updateMany`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Value>>,
    /// Client snapshot for `getDifference`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Vec<SnapshotEntry>>,
}

impl DbRequest {
    /// Creates a bare request with no parameters.
    pub fn new(collection: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            method: method.into(),
            filter: None,
            options: None,
            id: None,
            document: None,
            documents: None,
            snapshot: None,
        }
    }

    /// Sets the target document id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the document payload.
    pub fn with_document(mut self, document: Value) -> Self {
        self.document = Some(document);
        self
    }

    /// Sets the document payloads.
    pub fn with_documents(mut self, documents: Vec<Value>) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Sets the equality filter.
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the find options.
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the client snapshot.
    pub fn with_snapshot(mut self, snapshot: Vec<SnapshotEntry>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}
