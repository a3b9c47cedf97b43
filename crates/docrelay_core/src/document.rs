//! The schemaless document type.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Field holding a document's unique identifier within its collection.
pub const ID_FIELD: &str = "_id";

/// Field holding a document's last-modified time in milliseconds since epoch.
pub const UPDATED_FIELD: &str = "updated";

/// Returns the current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// A schemaless document.
///
/// A document is a JSON object. Beyond the two well-known fields `_id`
/// (string, unique within a collection) and `updated` (integer milliseconds,
/// stamped by the store on every write), all fields are opaque payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if the value is not a JSON object.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::invalid_document(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Converts the document back into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Returns the document id, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Sets the document id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.insert(ID_FIELD.to_string(), Value::String(id.into()));
    }

    /// Returns the last-modified timestamp, or 0 when absent.
    pub fn updated(&self) -> i64 {
        self.0
            .get(UPDATED_FIELD)
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// Stamps the last-modified timestamp.
    pub fn touch(&mut self, now_ms: i64) {
        self.0
            .insert(UPDATED_FIELD.to_string(), Value::Number(now_ms.into()));
    }

    /// Returns a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Removes a field, returning its previous value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Merges every field of `other` into this document, overwriting on
    /// collision. The id and timestamp fields are merged like any other;
    /// callers that key by id must re-assert it afterwards.
    pub fn merge(&mut self, other: &Document) {
        for (field, value) in &other.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }

    /// Returns the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_requires_object() {
        assert!(Document::from_value(json!({"a": 1})).is_ok());
        assert!(Document::from_value(json!([1, 2])).is_err());
        assert!(Document::from_value(json!("text")).is_err());
        assert!(Document::from_value(json!(null)).is_err());
    }

    #[test]
    fn id_accessor() {
        let mut doc = Document::new();
        assert_eq!(doc.id(), None);

        doc.set_id("abc");
        assert_eq!(doc.id(), Some("abc"));

        // Non-string ids are treated as absent.
        doc.insert(ID_FIELD, json!(42));
        assert_eq!(doc.id(), None);
    }

    #[test]
    fn updated_defaults_to_zero() {
        let mut doc = Document::new();
        assert_eq!(doc.updated(), 0);

        doc.touch(1_700_000_000_000);
        assert_eq!(doc.updated(), 1_700_000_000_000);
    }

    #[test]
    fn merge_overwrites_and_adds() {
        let mut base = Document::from_value(json!({"a": 1, "b": 2})).unwrap();
        let patch = Document::from_value(json!({"b": 3, "c": 4})).unwrap();

        base.merge(&patch);
        assert_eq!(base.get("a"), Some(&json!(1)));
        assert_eq!(base.get("b"), Some(&json!(3)));
        assert_eq!(base.get("c"), Some(&json!(4)));
    }

    #[test]
    fn field_count() {
        let mut doc = Document::new();
        assert!(doc.is_empty());

        doc.insert("a", json!(1));
        doc.insert("b", json!(2));
        assert_eq!(doc.len(), 2);

        doc.remove("a");
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn serde_is_transparent() {
        let doc = Document::from_value(json!({"x": 1})).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        assert_eq!(text, r#"{"x":1}"#);

        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn now_millis_is_recent() {
        // Sanity: after 2020, before 2100.
        let now = now_millis();
        assert!(now > 1_577_836_800_000);
        assert!(now < 4_102_444_800_000);
    }
}
