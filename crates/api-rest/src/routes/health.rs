//! Health check endpoints.

use crate::{responses::Response, state::AppState};
use axum::{extract::State, http::StatusCode, routing::get, Router};
use gala_domain::GalaId;
use gala_infrastructure::{Error as StoreError, Repository};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Individual component checks
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessChecks {
    /// Document store reachable
    pub store: bool,
}

/// Health check routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

/// Basic health check
///
/// Returns service status and version information.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> Response<HealthResponse> {
    Response::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check
///
/// Probes the document store with a lookup of the nil gala key.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Document store unreachable", body = ReadinessResponse),
    )
)]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Response<ReadinessResponse>) {
    let store = match state.galas.read_entity(GalaId::nil()).await {
        Ok(_) | Err(StoreError::NotFound(_)) => true,
        Err(err) => {
            warn!(error = %err, "Document store readiness probe failed");
            false
        }
    };

    let status = if store {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let checks = ReadinessChecks { store };
    (status, Response::success(ReadinessResponse { ready: store, checks }))
}
