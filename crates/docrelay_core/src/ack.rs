//! Write acknowledgments returned by collection operations.

use serde::{Deserialize, Serialize};

/// Acknowledgment for a single insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertAck {
    /// Id of the inserted document (assigned by the store when the client
    /// omitted one).
    pub inserted_id: String,
}

/// Acknowledgment for a multi-document insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertManyAck {
    /// Ids of the inserted documents, in input order.
    pub inserted_ids: Vec<String>,
}

/// Acknowledgment for an update-or-insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAck {
    /// Number of existing documents matched by the id (0 or 1).
    pub matched_count: u64,
    /// Number of documents modified (0 or 1).
    pub modified_count: u64,
    /// Id of the created document when the update fell back to an insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<String>,
}

impl UpdateAck {
    /// Ack for an update that matched an existing document.
    pub fn updated() -> Self {
        Self {
            matched_count: 1,
            modified_count: 1,
            upserted_id: None,
        }
    }

    /// Ack for an update that created the document.
    pub fn upserted(id: impl Into<String>) -> Self {
        Self {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.into()),
        }
    }
}

/// Acknowledgment for a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    /// Number of documents removed (0 or 1).
    pub deleted_count: u64,
}
