//! Password-based credential verification.

use crate::error::{ServerError, ServerResult};
use crate::hash::PasswordHasher;
use docrelay_core::{Document, Filter, FindOptions, Store};
use serde_json::Value;
use std::sync::Arc;

/// Collection holding user documents.
pub const USERS_COLLECTION: &str = "users";

/// Field holding the unique username.
pub const USERNAME_FIELD: &str = "username";

/// Field holding the password digest.
pub const PASSWORD_FIELD: &str = "password";

/// Field holding the active flag; 1 means active, anything else inactive.
pub const ACTIVE_FIELD: &str = "active";

/// Checks username/password pairs against stored user documents.
///
/// Verification is purely a query: no sessions, no counters, no writes.
/// Externally every failure is the same `InvalidCredentials` error; whether
/// the user was missing, inactive or the password wrong is visible only in
/// the debug log, so responses cannot be used to enumerate usernames.
pub struct CredentialVerifier {
    store: Store,
    hasher: Arc<PasswordHasher>,
}

impl CredentialVerifier {
    /// Creates a verifier over the given store.
    pub fn new(store: Store, hasher: Arc<PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Verifies a username/password pair.
    ///
    /// On success returns the user document with the password digest
    /// stripped.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for any unknown, inactive or mismatched pair;
    /// `StoreUnavailable` when the store is closed.
    pub fn verify(&self, username: &str, password: &str) -> ServerResult<Document> {
        let users = self.store.collection(USERS_COLLECTION)?;

        let mut filter = Filter::new();
        filter.insert(
            USERNAME_FIELD.to_string(),
            Value::String(username.to_string()),
        );
        filter.insert(ACTIVE_FIELD.to_string(), Value::Number(1.into()));

        let options = FindOptions {
            limit: Some(1),
            ..FindOptions::default()
        };
        let Some(mut user) = users.find(&filter, &options).pop() else {
            tracing::debug!(username, "login rejected: unknown or inactive user");
            return Err(ServerError::InvalidCredentials);
        };

        let digest = user
            .get(PASSWORD_FIELD)
            .and_then(Value::as_str)
            .unwrap_or("");
        if !self.hasher.verify(password, digest) {
            tracing::debug!(username, "login rejected: password mismatch");
            return Err(ServerError::InvalidCredentials);
        }

        user.remove(PASSWORD_FIELD);
        tracing::debug!(username, "login accepted");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hasher() -> Arc<PasswordHasher> {
        Arc::new(PasswordHasher::new(32, 1).unwrap())
    }

    fn store_with_user(hasher: &PasswordHasher, username: &str, password: &str, active: i64) -> Store {
        let store = Store::new();
        let users = store.collection(USERS_COLLECTION).unwrap();
        let doc = Document::from_value(json!({
            "_id": format!("usr-{username}"),
            "username": username,
            "password": hasher.hash(password).unwrap(),
            "active": active,
        }))
        .unwrap();
        users.insert_one(doc).unwrap();
        store
    }

    #[test]
    fn accepts_active_user_with_matching_password() {
        let hasher = hasher();
        let store = store_with_user(&hasher, "admin", "pw", 1);
        let verifier = CredentialVerifier::new(store, hasher);

        let user = verifier.verify("admin", "pw").unwrap();
        assert_eq!(user.get("username"), Some(&json!("admin")));
        // The digest never leaves the verifier.
        assert!(user.get(PASSWORD_FIELD).is_none());
    }

    #[test]
    fn rejects_wrong_password() {
        let hasher = hasher();
        let store = store_with_user(&hasher, "admin", "pw", 1);
        let verifier = CredentialVerifier::new(store, hasher);

        let err = verifier.verify("admin", "wrong").unwrap_err();
        assert!(matches!(err, ServerError::InvalidCredentials));
    }

    #[test]
    fn inactive_and_unknown_users_fail_identically() {
        let hasher = hasher();
        let store = store_with_user(&hasher, "admin", "pw", 0);
        let verifier = CredentialVerifier::new(store, hasher);

        // Correct password, inactive user.
        let inactive = verifier.verify("admin", "pw").unwrap_err();
        // User that does not exist at all.
        let unknown = verifier.verify("ghost", "pw").unwrap_err();

        assert_eq!(inactive.to_string(), unknown.to_string());
        assert_eq!(
            inactive.status_code(),
            unknown.status_code(),
        );
    }

    #[test]
    fn closed_store_surfaces_unavailable() {
        let hasher = hasher();
        let store = Store::new();
        store.close();
        let verifier = CredentialVerifier::new(store, hasher);

        let err = verifier.verify("admin", "pw").unwrap_err();
        assert!(matches!(err, ServerError::StoreUnavailable));
    }

    #[test]
    fn user_without_digest_is_rejected() {
        let hasher = hasher();
        let store = Store::new();
        let users = store.collection(USERS_COLLECTION).unwrap();
        users
            .insert_one(
                Document::from_value(json!({
                    "_id": "usr-broken",
                    "username": "broken",
                    "active": 1,
                }))
                .unwrap(),
            )
            .unwrap();
        let verifier = CredentialVerifier::new(store, hasher);

        let err = verifier.verify("broken", "anything").unwrap_err();
        assert!(matches!(err, ServerError::InvalidCredentials));
    }
}
