//! Equality filters and find options.

use crate::document::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// An equality filter: a JSON object whose every field must match the
/// corresponding document field exactly. An empty filter matches everything.
pub type Filter = Map<String, Value>;

/// Options applied to `find` results after filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    /// Sort specification: field name to direction (1 ascending, -1
    /// descending). Multiple keys are applied in lexicographic field order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<BTreeMap<String, i32>>,

    /// Number of matching documents to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,

    /// Maximum number of documents to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Returns true when every filter field equals the document field.
pub(crate) fn matches(doc: &Document, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(field, expected)| doc.get(field) == Some(expected))
}

/// Applies sort, skip and limit to an already-filtered result set.
pub(crate) fn apply_options(mut docs: Vec<Document>, options: &FindOptions) -> Vec<Document> {
    if let Some(sort) = &options.sort {
        docs.sort_by(|a, b| {
            for (field, direction) in sort {
                let ordering = compare_values(a.get(field), b.get(field));
                let ordering = if *direction < 0 {
                    ordering.reverse()
                } else {
                    ordering
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    let skip = options.skip.unwrap_or(0);
    let docs: Vec<Document> = if skip > 0 {
        docs.into_iter().skip(skip).collect()
    } else {
        docs
    };

    match options.limit {
        Some(limit) => docs.into_iter().take(limit).collect(),
        None => docs,
    }
}

/// Total order over JSON values for sorting: null < bool < number < string
/// < array < object. Arrays and objects compare only by rank.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => rank(a).cmp(&rank(b)),
        },
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
