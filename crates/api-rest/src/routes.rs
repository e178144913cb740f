//! HTTP route handlers.
//!
//! This module organizes all API endpoints by resource.

pub mod galas;
pub mod health;
pub mod performers;
pub mod programs;
pub mod view_models;

use crate::state::AppState;
use axum::Router;

// Re-export for convenience
pub use health::routes as health_routes;

/// Create all resource routes, to be nested under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(galas::routes())
        .merge(programs::routes())
        .merge(performers::routes())
}
