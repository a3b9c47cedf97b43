//! Error taxonomy for the server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docrelay_core::CoreError;
use serde::Serialize;
use serde_json::Value;
use std::io;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving client calls.
///
/// Every failure surfaces to the caller as a structured result; nothing is
/// silently swallowed. There are no automatic retries: callers retry
/// themselves, which is safe because writes are id-keyed upserts.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The store is not available (closed or not yet ready).
    #[error("database service unavailable")]
    StoreUnavailable,

    /// A lookup missed. Internal use; login paths collapse this into
    /// `InvalidCredentials` before anything leaves the process.
    #[error("not found: {0}")]
    NotFound(String),

    /// Credential check failed. Deliberately carries no detail: unknown
    /// username, inactive user and wrong password all produce this exact
    /// error.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The requested method is outside the supported enumeration. Raised
    /// before any store access.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// A required parameter is absent or malformed.
    #[error("missing or invalid input: {0}")]
    MissingInput(String),

    /// A store operation failed mid-call. Partial effects already committed
    /// (earlier items of a multi-document write) are not rolled back.
    #[error("database operation failed: {0}")]
    OperationFailed(String),

    /// I/O error (binding, serving).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Wire shape of a failed call: `{error, details?}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ServerError {
    /// Creates an operation failure wrapping an underlying cause.
    pub fn operation_failed(cause: impl Into<String>) -> Self {
        Self::OperationFailed(cause.into())
    }

    /// Creates a missing-input error.
    pub fn missing_input(what: impl Into<String>) -> Self {
        Self::MissingInput(what.into())
    }

    /// Returns the HTTP-analogous status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UnsupportedMethod(_) | Self::MissingInput(_) => StatusCode::BAD_REQUEST,
            Self::OperationFailed(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Returns the error body as a JSON value, for transports that embed
    /// errors inside their own envelope (the socket reply).
    pub fn to_body_value(&self) -> Value {
        serde_json::to_value(self.body()).unwrap_or_else(|_| {
            // ErrorBody is two strings; serialization cannot realistically
            // fail, but never panic on an error path.
            Value::String(self.to_string())
        })
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::OperationFailed(cause) => ErrorBody {
                error: "database operation failed".to_string(),
                details: Some(cause.clone()),
            },
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        }
    }
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StoreClosed => Self::StoreUnavailable,
            other => Self::OperationFailed(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
