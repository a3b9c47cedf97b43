//! Server assembly and serving.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::http::app_router;
use crate::seed;
use crate::state::AppState;

/// Builds the full server from a configuration and serves it until the
/// process stops.
///
/// # Errors
///
/// Returns an error when the hasher configuration is unusable, seeding
/// fails, or the listener cannot bind.
pub async fn serve(config: ServerConfig) -> ServerResult<()> {
    let state = AppState::from_config(config)?;
    serve_with_state(state).await
}

/// Serves an already-built state; used when the caller wants to prepare the
/// store (or skip seeding) itself.
pub async fn serve_with_state(state: AppState) -> ServerResult<()> {
    if state.config.seed_admin {
        seed::ensure_admin(&state.store, &state.hasher, &state.config.admin_password)?;
    }

    let bind_addr = state.config.bind_addr;
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "docrelay listening");
    axum::serve(listener, router).await?;
    Ok(())
}
