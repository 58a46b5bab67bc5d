//! Reference directory backend.
//!
//! Serves the `[[destinations]]` table of the config over the same plain-text
//! contract a venue's directory speaks, so a kiosk can be run and tested
//! end to end without the venue backend.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `<server.path>?search=<q>` | Names containing `q` (case-insensitive), one per line, config order |
//! | `GET`  | `<server.path>?destination=<name>` | `x,y,z` for an exact name; `404` if unknown |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! A request with neither parameter is `400`. When both are given,
//! `destination` wins.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::config::{Config, DestinationConfig};

#[derive(Clone)]
struct AppState {
    destinations: Arc<Vec<DestinationConfig>>,
}

/// Builds the router without binding a socket.
pub fn router(config: &Config) -> Router {
    let state = AppState {
        destinations: Arc::new(config.destinations.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(&config.server.path, get(handle_directory))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Starts the directory server on `[server].bind` and serves until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    let addr = listener.local_addr()?;
    println!(
        "Directory server listening on http://{}{} ({} destinations)",
        addr,
        config.server.path,
        config.destinations.len()
    );
    axum::serve(listener, router(config)).await?;
    Ok(())
}

/// Binds `[server].bind` and serves in a background task.
///
/// Returns the bound address, which is how callers learn the port when
/// binding to `:0`.
pub async fn spawn_server(config: &Config) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    let addr = listener.local_addr()?;
    let app = router(config);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "directory server stopped");
        }
    });
    info!(%addr, "directory server started");
    Ok((addr, handle))
}

// ============ GET <server.path> ============

#[derive(Debug, Deserialize)]
struct DirectoryQuery {
    search: Option<String>,
    destination: Option<String>,
}

async fn handle_directory(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Response {
    if let Some(name) = query.destination {
        debug!(destination = %name, "resolve");
        return match state.destinations.iter().find(|d| d.name == name) {
            Some(dest) => (StatusCode::OK, dest.position.to_string()).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                format!("unknown destination: {}", name),
            )
                .into_response(),
        };
    }

    if let Some(search) = query.search {
        debug!(search = %search, "filter");
        let body = filter_names(&state.destinations, &search).join("\n");
        return (StatusCode::OK, body).into_response();
    }

    (
        StatusCode::BAD_REQUEST,
        "expected a search or destination parameter",
    )
        .into_response()
}

/// Case-insensitive substring match, in configured order. Empty queries match nothing.
fn filter_names<'a>(destinations: &'a [DestinationConfig], query: &str) -> Vec<&'a str> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    destinations
        .iter()
        .filter(|d| d.name.to_lowercase().contains(&needle))
        .map(|d| d.name.as_str())
        .collect()
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
