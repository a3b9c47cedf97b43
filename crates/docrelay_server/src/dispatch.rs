//! The generic operation dispatcher.

use crate::error::{ServerError, ServerResult};
use crate::sync;
use docrelay_core::{Document, Filter, FindOptions, Store};
use docrelay_protocol::{DbRequest, Method};
use serde::Serialize;
use serde_json::Value;

/// Maps client-specified method names onto store operations.
///
/// The dispatcher captures its store at construction; there is no ambient
/// connection state. Method names parse into the closed `Method`
/// enumeration before anything touches the store, so an unknown name fails
/// with `UnsupportedMethod` without a single store access. Each call is
/// independent: no cross-call ordering, no locking beyond the store's own.
pub struct Dispatcher {
    store: Store,
}

impl Dispatcher {
    /// Creates a dispatcher over the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Executes one client-specified operation and returns its raw result.
    ///
    /// # Errors
    ///
    /// `UnsupportedMethod` for names outside the enumeration (fail closed),
    /// `MissingInput` for absent or malformed parameters, `OperationFailed`
    /// for store-level failures (partial effects of multi-document writes
    /// stay committed), `StoreUnavailable` when the store is closed.
    pub fn dispatch(&self, request: &DbRequest) -> ServerResult<Value> {
        let method = Method::parse(&request.method)
            .ok_or_else(|| ServerError::UnsupportedMethod(request.method.clone()))?;

        if request.collection.is_empty() {
            return Err(ServerError::missing_input("collection"));
        }
        let collection = self.store.collection(&request.collection)?;

        let result = match method {
            Method::Find => {
                let filter = parse_filter(request.filter.as_ref())?;
                let options = parse_options(request.options.as_ref())?;
                to_value(collection.find(&filter, &options))?
            }
            Method::FindOne => {
                let id = require_id(request)?;
                to_value(collection.find_one(id))?
            }
            Method::InsertOne => {
                let document = require_document(request)?;
                to_value(collection.insert_one(document)?)?
            }
            Method::InsertMany => {
                let documents = require_documents(request)?;
                to_value(collection.insert_many(documents)?)?
            }
            Method::UpdateOne => {
                let id = require_id(request)?;
                let document = require_document(request)?;
                to_value(collection.update_one(id, document))?
            }
            Method::UpdateMany => {
                let documents = require_documents(request)?;
                to_value(collection.update_many(documents)?)?
            }
            Method::DeleteOne => {
                let id = require_id(request)?;
                to_value(collection.delete_one(id))?
            }
            Method::GetDifference => {
                let snapshot = request
                    .snapshot
                    .as_ref()
                    .ok_or_else(|| ServerError::missing_input("snapshot"))?;
                to_value(sync::difference(&collection, snapshot))?
            }
        };

        tracing::debug!(
            collection = %request.collection,
            method = %method,
            write = method.is_write(),
            "dispatched"
        );
        Ok(result)
    }
}

fn require_id(request: &DbRequest) -> ServerResult<&str> {
    request
        .id
        .as_deref()
        .ok_or_else(|| ServerError::missing_input("_id"))
}

fn require_document(request: &DbRequest) -> ServerResult<Document> {
    let value = request
        .document
        .clone()
        .ok_or_else(|| ServerError::missing_input("document"))?;
    Document::from_value(value).map_err(|err| ServerError::missing_input(err.to_string()))
}

fn require_documents(request: &DbRequest) -> ServerResult<Vec<Document>> {
    let values = request
        .documents
        .clone()
        .ok_or_else(|| ServerError::missing_input("documents"))?;
    values
        .into_iter()
        .map(|value| {
            Document::from_value(value).map_err(|err| ServerError::missing_input(err.to_string()))
        })
        .collect()
}

fn parse_filter(filter: Option<&Value>) -> ServerResult<Filter> {
    match filter {
        None | Some(Value::Null) => Ok(Filter::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(ServerError::missing_input("filter must be a JSON object")),
    }
}

fn parse_options(options: Option<&Value>) -> ServerResult<FindOptions> {
    match options {
        None | Some(Value::Null) => Ok(FindOptions::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|err| ServerError::missing_input(format!("options: {err}"))),
    }
}

fn to_value<T: Serialize>(result: T) -> ServerResult<Value> {
    serde_json::to_value(result)
        .map_err(|err| ServerError::Internal(format!("result serialization failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrelay_protocol::SnapshotEntry;
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Store::new())
    }

    #[test]
    fn unknown_method_fails_closed() {
        let dispatcher = dispatcher();
        let request = DbRequest::new("tasks", "dropDatabase");

        let err = dispatcher.dispatch(&request).unwrap_err();
        assert!(matches!(err, ServerError::UnsupportedMethod(_)));

        // Fail closed: not even the collection was created.
        assert!(dispatcher.store().collection_names().is_empty());
    }

    #[test]
    fn empty_collection_name_is_rejected() {
        let dispatcher = dispatcher();
        let request = DbRequest::new("", "find");

        let err = dispatcher.dispatch(&request).unwrap_err();
        assert!(matches!(err, ServerError::MissingInput(_)));
    }

    #[test]
    fn insert_and_find_one() {
        let dispatcher = dispatcher();

        let ack = dispatcher
            .dispatch(
                &DbRequest::new("tasks", "insertOne")
                    .with_document(json!({"_id": "t1", "title": "first"})),
            )
            .unwrap();
        assert_eq!(ack["inserted_id"], "t1");

        let found = dispatcher
            .dispatch(&DbRequest::new("tasks", "findOne").with_id("t1"))
            .unwrap();
        assert_eq!(found["title"], "first");

        let missing = dispatcher
            .dispatch(&DbRequest::new("tasks", "findOne").with_id("t2"))
            .unwrap();
        assert!(missing.is_null());
    }

    #[test]
    fn find_with_filter_and_options() {
        let dispatcher = dispatcher();
        dispatcher
            .dispatch(&DbRequest::new("tasks", "insertMany").with_documents(vec![
                json!({"_id": "a", "done": true, "n": 2}),
                json!({"_id": "b", "done": false, "n": 1}),
                json!({"_id": "c", "done": true, "n": 3}),
            ]))
            .unwrap();

        let result = dispatcher
            .dispatch(
                &DbRequest::new("tasks", "find")
                    .with_filter(json!({"done": true}))
                    .with_options(json!({"sort": {"n": -1}})),
            )
            .unwrap();

        let ids: Vec<&str> = result
            .as_array()
            .unwrap()
            .iter()
            .map(|doc| doc["_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn find_rejects_non_object_filter() {
        let dispatcher = dispatcher();
        let request = DbRequest::new("tasks", "find").with_filter(json!([1, 2]));

        let err = dispatcher.dispatch(&request).unwrap_err();
        assert!(matches!(err, ServerError::MissingInput(_)));
    }

    #[test]
    fn update_one_requires_id_and_document() {
        let dispatcher = dispatcher();

        let err = dispatcher
            .dispatch(&DbRequest::new("tasks", "updateOne").with_document(json!({"a": 1})))
            .unwrap_err();
        assert!(matches!(err, ServerError::MissingInput(_)));

        let err = dispatcher
            .dispatch(&DbRequest::new("tasks", "updateOne").with_id("t1"))
            .unwrap_err();
        assert!(matches!(err, ServerError::MissingInput(_)));
    }

    #[test]
    fn update_one_upserts() {
        let dispatcher = dispatcher();
        let ack = dispatcher
            .dispatch(
                &DbRequest::new("tasks", "updateOne")
                    .with_id("t1")
                    .with_document(json!({"title": "fresh"})),
            )
            .unwrap();
        assert_eq!(ack["upserted_id"], "t1");

        let ack = dispatcher
            .dispatch(
                &DbRequest::new("tasks", "updateOne")
                    .with_id("t1")
                    .with_document(json!({"title": "patched"})),
            )
            .unwrap();
        assert_eq!(ack["matched_count"], 1);
    }

    #[test]
    fn delete_one_acks_absent_ids() {
        let dispatcher = dispatcher();
        let ack = dispatcher
            .dispatch(&DbRequest::new("tasks", "deleteOne").with_id("nope"))
            .unwrap();
        assert_eq!(ack["deleted_count"], 0);
    }

    #[test]
    fn duplicate_insert_is_operation_failed() {
        let dispatcher = dispatcher();
        let request =
            DbRequest::new("tasks", "insertOne").with_document(json!({"_id": "t1"}));

        dispatcher.dispatch(&request).unwrap();
        let err = dispatcher.dispatch(&request).unwrap_err();
        assert!(matches!(err, ServerError::OperationFailed(_)));
    }

    #[test]
    fn insert_many_partial_completion_survives_failure() {
        let dispatcher = dispatcher();
        let err = dispatcher
            .dispatch(&DbRequest::new("tasks", "insertMany").with_documents(vec![
                json!({"_id": "a"}),
                json!({"_id": "a"}),
                json!({"_id": "c"}),
            ]))
            .unwrap_err();
        assert!(matches!(err, ServerError::OperationFailed(_)));

        // First item committed despite the failed call.
        let found = dispatcher
            .dispatch(&DbRequest::new("tasks", "findOne").with_id("a"))
            .unwrap();
        assert!(!found.is_null());
    }

    #[test]
    fn get_difference_requires_snapshot() {
        let dispatcher = dispatcher();
        let err = dispatcher
            .dispatch(&DbRequest::new("tasks", "getDifference"))
            .unwrap_err();
        assert!(matches!(err, ServerError::MissingInput(_)));
    }

    #[test]
    fn get_difference_roundtrip() {
        let dispatcher = dispatcher();
        dispatcher
            .dispatch(&DbRequest::new("tasks", "insertMany").with_documents(vec![
                json!({"_id": "a"}),
                json!({"_id": "b"}),
            ]))
            .unwrap();

        // Empty snapshot: everything comes back.
        let all = dispatcher
            .dispatch(&DbRequest::new("tasks", "getDifference").with_snapshot(vec![]))
            .unwrap();
        assert_eq!(all.as_array().unwrap().len(), 2);

        // Complete snapshot: nothing comes back.
        let snapshot: Vec<SnapshotEntry> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|doc| {
                SnapshotEntry::new(
                    doc["_id"].as_str().unwrap(),
                    doc["updated"].as_i64().unwrap(),
                )
            })
            .collect();
        let none = dispatcher
            .dispatch(&DbRequest::new("tasks", "getDifference").with_snapshot(snapshot))
            .unwrap();
        assert!(none.as_array().unwrap().is_empty());
    }

    #[test]
    fn closed_store_maps_to_unavailable() {
        let dispatcher = dispatcher();
        dispatcher.store().close();

        let err = dispatcher
            .dispatch(&DbRequest::new("tasks", "find"))
            .unwrap_err();
        assert!(matches!(err, ServerError::StoreUnavailable));
    }
}
