//! Login and hash utility bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A username/password login attempt.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username to look up.
    pub username: String,
    /// Plaintext password to verify.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of a successful login.
///
/// `user` carries the user document with the password digest stripped.
/// Failed logins never produce this body; they surface as the transport's
/// generic error shape, identical for every failure cause, so the response
/// never reveals whether the username exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always true; failures use the error shape instead.
    pub success: bool,
    /// The authenticated user, password field removed.
    pub user: Value,
}

impl LoginResponse {
    /// Successful login carrying the stripped user document.
    pub fn success(user: Value) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// Request to hash a piece of text for storage.
#[derive(Clone, Serialize, Deserialize)]
pub struct HashRequest {
    /// Text to hash. The empty string is a valid input.
    pub text: String,
}

impl fmt::Debug for HashRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRequest")
            .field("text", &"[REDACTED]")
            .finish()
    }
}

/// A produced hash digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashResponse {
    /// PHC-format digest string.
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_success_shape() {
        let value =
            serde_json::to_value(LoginResponse::success(json!({"username": "admin"}))).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "user": {"username": "admin"}})
        );
    }

    #[test]
    fn debug_redacts_password() {
        let request = LoginRequest {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let output = format!("{request:?}");
        assert!(output.contains("admin"));
        assert!(!output.contains("hunter2"));
    }

    #[test]
    fn hash_request_allows_empty_text() {
        let request: HashRequest = serde_json::from_value(json!({"text": ""})).unwrap();
        assert_eq!(request.text, "");

        let missing: Result<HashRequest, _> = serde_json::from_value(json!({}));
        assert!(missing.is_err());
    }
}
