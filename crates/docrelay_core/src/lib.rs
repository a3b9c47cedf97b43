//! # Docrelay Core
//!
//! Embedded schemaless document store for docrelay.
//!
//! This crate provides:
//! - `Document`: a JSON object carrying an `_id` and an `updated` timestamp
//! - `Collection`: a named, unordered set of documents with CRUD operations
//! - `Store`: an explicitly constructed handle owning all collections
//! - Equality filters and find options (sort, skip, limit)
//!
//! # Semantics
//!
//! Collections are created implicitly on first access and never destroyed.
//! Every write path stamps `updated` with the current wall-clock time in
//! milliseconds; clients never control that field. Multi-document writes
//! (`insert_many`, `update_many`) are ordered and non-atomic: a failure
//! aborts the call but leaves earlier items committed.
//!
//! # Example
//!
//! ```rust,ignore
//! use docrelay_core::{Document, Store};
//!
//! let store = Store::new();
//! let tasks = store.collection("tasks")?;
//!
//! let mut doc = Document::new();
//! doc.insert("title", "write the report".into());
//! let ack = tasks.insert_one(doc)?;
//! assert!(tasks.find_one(&ack.inserted_id).is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod ack;
mod collection;
mod document;
mod error;
mod query;
mod store;

pub use ack::{DeleteAck, InsertAck, InsertManyAck, UpdateAck};
pub use collection::Collection;
pub use document::{now_millis, Document, ID_FIELD, UPDATED_FIELD};
pub use error::{CoreError, CoreResult};
pub use query::{Filter, FindOptions};
pub use store::Store;
