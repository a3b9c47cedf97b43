//! The closed enumeration of database operations.

use std::fmt;

/// A database operation a client may request.
///
/// The set is closed: any method name outside this enumeration must be
/// rejected before touching the store. `parse` is the only way in from the
/// wire, so an unknown name can never reach a dispatch arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Return all documents matching a filter.
    Find,
    /// Return the document with a given id.
    FindOne,
    /// Insert one document.
    InsertOne,
    /// Insert a sequence of documents, ordered, non-atomic.
    InsertMany,
    /// Merge fields into the document with a given id, creating it when
    /// absent.
    UpdateOne,
    /// Apply `UpdateOne` semantics independently per document.
    UpdateMany,
    /// Remove the document with a given id.
    DeleteOne,
    /// Compute the documents a client snapshot is missing or holds stale.
    GetDifference,
}

impl Method {
    /// Every method, in wire order.
    pub const ALL: [Method; 8] = [
        Method::Find,
        Method::FindOne,
        Method::InsertOne,
        Method::InsertMany,
        Method::UpdateOne,
        Method::UpdateMany,
        Method::DeleteOne,
        Method::GetDifference,
    ];

    /// Parses a wire method name. Returns `None` for anything outside the
    /// enumeration.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "find" => Some(Method::Find),
            "findOne" => Some(Method::FindOne),
            "insertOne" => Some(Method::InsertOne),
            "insertMany" => Some(Method::InsertMany),
            "updateOne" => Some(Method::UpdateOne),
            "updateMany" => Some(Method::UpdateMany),
            "deleteOne" => Some(Method::DeleteOne),
            "getDifference" => Some(Method::GetDifference),
            _ => None,
        }
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Find => "find",
            Method::FindOne => "findOne",
            Method::InsertOne => "insertOne",
            Method::InsertMany => "insertMany",
            Method::UpdateOne => "updateOne",
            Method::UpdateMany => "updateMany",
            Method::DeleteOne => "deleteOne",
            Method::GetDifference => "getDifference",
        }
    }

    /// Returns true for methods that can modify the store.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Method::InsertOne
                | Method::InsertMany
                | Method::UpdateOne
                | Method::UpdateMany
                | Method::DeleteOne
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_method() {
        for method in Method::ALL {
            assert_eq!(Method::parse(method.as_str()), Some(method));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(Method::parse("drop"), None);
        assert_eq!(Method::parse("FIND"), None);
        assert_eq!(Method::parse("findone"), None);
        assert_eq!(Method::parse(""), None);
    }

    #[test]
    fn write_classification() {
        assert!(Method::InsertOne.is_write());
        assert!(Method::DeleteOne.is_write());
        assert!(!Method::Find.is_write());
        assert!(!Method::GetDifference.is_write());
    }
}
