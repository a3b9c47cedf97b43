//! Error types for the document store.

use thiserror::Error;

/// Result type for store operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in document store operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The store has been closed and accepts no new collection handles.
    #[error("store is closed")]
    StoreClosed,

    /// A document with the same `_id` already exists in the collection.
    #[error("duplicate document id: {id}")]
    DuplicateId {
        /// The conflicting id.
        id: String,
    },

    /// The document is structurally unusable (e.g. a non-string `_id`).
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a duplicate id error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}
