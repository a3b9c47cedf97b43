//! Named document collections.

use crate::ack::{DeleteAck, InsertAck, InsertManyAck, UpdateAck};
use crate::document::{now_millis, Document, ID_FIELD};
use crate::error::{CoreError, CoreResult};
use crate::query::{apply_options, matches, Filter, FindOptions};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// A named, unordered set of documents.
///
/// `Collection` is a cheap handle: clones share the same underlying state,
/// so a handle captured at startup observes writes made through any other
/// handle. All writes stamp the document's `updated` field server-side.
///
/// Concurrent writers to the same id race last-write-wins; the collection
/// provides no ordering guarantee beyond the internal lock.
#[derive(Debug, Clone)]
pub struct Collection {
    name: Arc<str>,
    documents: Arc<RwLock<BTreeMap<String, Document>>>,
}

impl Collection {
    /// Creates an empty collection.
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            documents: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every document matching the filter, with options applied.
    pub fn find(&self, filter: &Filter, options: &FindOptions) -> Vec<Document> {
        let docs = self.documents.read();
        let matching: Vec<Document> = docs
            .values()
            .filter(|doc| matches(doc, filter))
            .cloned()
            .collect();
        apply_options(matching, options)
    }

    /// Returns the document with the given id, or `None`.
    pub fn find_one(&self, id: &str) -> Option<Document> {
        self.documents.read().get(id).cloned()
    }

    /// Returns every document in the collection.
    pub fn scan(&self) -> Vec<Document> {
        self.documents.read().values().cloned().collect()
    }

    /// Inserts one document.
    ///
    /// Assigns a fresh id when the document carries none and stamps
    /// `updated`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` when `_id` is present but not a string and
    /// `DuplicateId` when a document with the same id already exists.
    pub fn insert_one(&self, document: Document) -> CoreResult<InsertAck> {
        let mut docs = self.documents.write();
        self.insert_locked(&mut docs, document)
    }

    /// Inserts a sequence of documents in order.
    ///
    /// Stops at the first failure; documents inserted before the failure
    /// remain committed and documents after it are not attempted.
    pub fn insert_many(&self, documents: Vec<Document>) -> CoreResult<InsertManyAck> {
        let mut docs = self.documents.write();
        let mut inserted_ids = Vec::with_capacity(documents.len());
        for document in documents {
            let ack = self.insert_locked(&mut docs, document)?;
            inserted_ids.push(ack.inserted_id);
        }
        Ok(InsertManyAck { inserted_ids })
    }

    /// Merges the document's fields into the document with the given id,
    /// creating it when absent (upsert).
    ///
    /// The stored document's `_id` is always the keyed id, regardless of any
    /// `_id` field inside `document`. Applying the same update twice leaves
    /// the same stored state apart from the `updated` stamp.
    pub fn update_one(&self, id: &str, document: Document) -> UpdateAck {
        let now = now_millis();
        let mut docs = self.documents.write();
        match docs.get_mut(id) {
            Some(existing) => {
                existing.merge(&document);
                existing.set_id(id);
                existing.touch(now);
                UpdateAck::updated()
            }
            None => {
                let mut fresh = document;
                fresh.set_id(id);
                fresh.touch(now);
                docs.insert(id.to_string(), fresh);
                UpdateAck::upserted(id)
            }
        }
    }

    /// Applies `update_one` semantics independently to each document, keyed
    /// by its own `_id`. Sequential, no all-or-nothing guarantee.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` for a document without a string `_id`;
    /// updates applied before the failure remain committed.
    pub fn update_many(&self, documents: Vec<Document>) -> CoreResult<Vec<UpdateAck>> {
        let mut acks = Vec::with_capacity(documents.len());
        for document in documents {
            let id = document
                .id()
                .ok_or_else(|| {
                    CoreError::invalid_document("update_many documents require a string _id")
                })?
                .to_string();
            acks.push(self.update_one(&id, document));
        }
        Ok(acks)
    }

    /// Removes the document with the given id; a no-op when absent.
    pub fn delete_one(&self, id: &str) -> DeleteAck {
        let removed = self.documents.write().remove(id);
        DeleteAck {
            deleted_count: u64::from(removed.is_some()),
        }
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true when the collection holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Removes every document (for testing).
    #[cfg(test)]
    pub fn clear(&self) {
        self.documents.write().clear();
    }

    fn insert_locked(
        &self,
        docs: &mut BTreeMap<String, Document>,
        mut document: Document,
    ) -> CoreResult<InsertAck> {
        let id = match document.id() {
            Some(id) => id.to_string(),
            None => {
                if document.get(ID_FIELD).is_some() {
                    return Err(CoreError::invalid_document("_id must be a string"));
                }
                let id = Uuid::new_v4().to_string();
                document.set_id(&id);
                id
            }
        };

        if docs.contains_key(&id) {
            return Err(CoreError::duplicate_id(id));
        }

        document.touch(now_millis());
        docs.insert(id.clone(), document);
        Ok(InsertAck { inserted_id: id })
    }
}
