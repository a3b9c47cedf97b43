//! The store owning all collections.

use crate::collection::Collection;
use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to the document store.
///
/// A `Store` owns a set of named collections. Collections are created
/// implicitly the first time they are requested and never destroyed.
/// Clones are cheap and share the same state; construct one store and pass
/// handles to every component that needs it instead of keeping ambient
/// global state.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    collections: RwLock<HashMap<String, Collection>>,
    closed: AtomicBool,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the named collection, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreClosed` after `close()`; handles obtained earlier keep
    /// working.
    pub fn collection(&self, name: &str) -> CoreResult<Collection> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(CoreError::StoreClosed);
        }

        if let Some(coll) = self.inner.collections.read().get(name) {
            return Ok(coll.clone());
        }

        let mut collections = self.inner.collections.write();
        // Re-check under the write lock; another handle may have created it.
        let coll = collections
            .entry(name.to_string())
            .or_insert_with(|| Collection::new(name));
        Ok(coll.clone())
    }

    /// Returns the names of all existing collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns true if the named collection has been created.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.collections.read().contains_key(name)
    }

    /// Marks the store closed. Subsequent `collection()` calls fail with
    /// `StoreClosed`.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    /// Returns true while the store accepts new collection handles.
    pub fn is_open(&self) -> bool {
        !self.inner.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde_json::json;

    #[test]
    fn collections_created_implicitly() {
        let store = Store::new();
        assert!(!store.contains("tasks"));

        store.collection("tasks").unwrap();
        assert!(store.contains("tasks"));
        assert_eq!(store.collection_names(), vec!["tasks".to_string()]);
    }

    #[test]
    fn same_name_returns_shared_state() {
        let store = Store::new();
        let a = store.collection("tasks").unwrap();
        let b = store.collection("tasks").unwrap();

        a.insert_one(Document::from_value(json!({"_id": "x"})).unwrap())
            .unwrap();
        assert!(b.find_one("x").is_some());
    }

    #[test]
    fn cloned_store_shares_collections() {
        let store = Store::new();
        let other = store.clone();

        store.collection("tasks").unwrap();
        assert!(other.contains("tasks"));
    }

    #[test]
    fn closed_store_rejects_new_handles() {
        let store = Store::new();
        let tasks = store.collection("tasks").unwrap();

        store.close();
        assert!(!store.is_open());
        assert!(matches!(
            store.collection("tasks"),
            Err(CoreError::StoreClosed)
        ));

        // A handle obtained before close keeps working.
        tasks
            .insert_one(Document::from_value(json!({"_id": "x"})).unwrap())
            .unwrap();
    }
}
