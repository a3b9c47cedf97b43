//! Request/response HTTP transport.
//!
//! One operation per call: a JSON request in, one JSON result or an
//! `{error, details?}` body out. The handlers deserialize their own bodies
//! from `Json<Value>` so malformed input surfaces as this server's 400
//! shape rather than the framework's default rejection.

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use crate::ws;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use docrelay_core::now_millis;
use docrelay_protocol::{DbRequest, HashRequest, HashResponse, LoginRequest, LoginResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the application router over the shared state.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(health))
        .route("/api/login", post(login))
        .route("/api/hash", post(hash_text))
        .route("/api/db", post(db_call))
        .route("/api/socket", get(ws::socket_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    collections: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: now_millis(),
        collections: state.store.collection_names().len(),
    })
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<LoginResponse>, ServerError> {
    let request: LoginRequest = parse_body(body)?;
    let user = state
        .verifier
        .verify(&request.username, &request.password)?;
    Ok(Json(LoginResponse::success(user.into_value())))
}

async fn hash_text(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<HashResponse>, ServerError> {
    let request: HashRequest = parse_body(body)?;
    let hash = state.hasher.hash(&request.text)?;
    Ok(Json(HashResponse { hash }))
}

async fn db_call(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ServerError> {
    let request: DbRequest = parse_body(body)?;
    let result = state.dispatcher.dispatch(&request)?;
    Ok(Json(result))
}

fn parse_body<T: DeserializeOwned>(body: Value) -> ServerResult<T> {
    serde_json::from_value(body).map_err(|err| ServerError::missing_input(err.to_string()))
}
