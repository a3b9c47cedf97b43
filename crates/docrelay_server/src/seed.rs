//! Startup seeding.
//!
//! Ensures exactly one admin user exists so a fresh deployment is loggable
//! into. The rest of the server tolerates a store that was never seeded;
//! seeding only makes the first login possible.

use crate::credentials::{ACTIVE_FIELD, PASSWORD_FIELD, USERNAME_FIELD, USERS_COLLECTION};
use crate::error::ServerResult;
use crate::hash::PasswordHasher;
use docrelay_core::{CoreError, Document, Filter, FindOptions, Store};
use serde_json::Value;

/// Fixed id of the seed admin user.
pub const ADMIN_USER_ID: &str = "usr-admin";

/// Username of the seed admin user.
pub const ADMIN_USERNAME: &str = "admin";

/// Ensures the seed admin user exists, creating it with the given password
/// when missing. An existing admin user is left untouched, whatever its
/// fields.
pub fn ensure_admin(store: &Store, hasher: &PasswordHasher, password: &str) -> ServerResult<()> {
    let users = store.collection(USERS_COLLECTION)?;

    let mut filter = Filter::new();
    filter.insert(
        USERNAME_FIELD.to_string(),
        Value::String(ADMIN_USERNAME.to_string()),
    );
    let options = FindOptions {
        limit: Some(1),
        ..FindOptions::default()
    };
    if !users.find(&filter, &options).is_empty() {
        tracing::info!("admin user already exists");
        return Ok(());
    }

    let digest = hasher.hash(password)?;
    let mut admin = Document::new();
    admin.set_id(ADMIN_USER_ID);
    admin.insert(USERNAME_FIELD, Value::String(ADMIN_USERNAME.to_string()));
    admin.insert(ACTIVE_FIELD, Value::Number(1.into()));
    admin.insert(PASSWORD_FIELD, Value::String(digest));

    match users.insert_one(admin) {
        Ok(_) => {
            tracing::info!("created seed admin user");
            Ok(())
        }
        // A concurrent seeder won the race; the admin exists either way.
        Err(CoreError::DuplicateId { .. }) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialVerifier;
    use serde_json::json;
    use std::sync::Arc;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(32, 1).unwrap()
    }

    #[test]
    fn creates_admin_when_missing() {
        let store = Store::new();
        let hasher = hasher();

        ensure_admin(&store, &hasher, "bootstrap-pw").unwrap();

        let users = store.collection(USERS_COLLECTION).unwrap();
        let admin = users.find_one(ADMIN_USER_ID).unwrap();
        assert_eq!(admin.get(USERNAME_FIELD), Some(&json!("admin")));
        assert_eq!(admin.get(ACTIVE_FIELD), Some(&json!(1)));

        // The seeded admin can actually log in.
        let verifier = CredentialVerifier::new(store, Arc::new(hasher));
        assert!(verifier.verify("admin", "bootstrap-pw").is_ok());
    }

    #[test]
    fn seeding_twice_is_idempotent() {
        let store = Store::new();
        let hasher = hasher();

        ensure_admin(&store, &hasher, "pw").unwrap();
        ensure_admin(&store, &hasher, "pw").unwrap();

        assert_eq!(store.collection(USERS_COLLECTION).unwrap().len(), 1);
    }

    #[test]
    fn existing_admin_is_left_untouched() {
        let store = Store::new();
        let hasher = hasher();

        let users = store.collection(USERS_COLLECTION).unwrap();
        users
            .insert_one(
                Document::from_value(json!({
                    "_id": "usr-custom",
                    "username": "admin",
                    "password": hasher.hash("original").unwrap(),
                    "active": 1,
                }))
                .unwrap(),
            )
            .unwrap();

        ensure_admin(&store, &hasher, "different").unwrap();

        // No second admin, original document intact.
        assert_eq!(users.len(), 1);
        assert!(users.find_one("usr-custom").is_some());
        assert!(users.find_one(ADMIN_USER_ID).is_none());
    }
}
