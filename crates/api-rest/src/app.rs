//! Application builder and configuration.
//!
//! This module provides the main application builder that assembles
//! all routes, middleware, and state into an Axum router.

use crate::{
    config::ApiConfig,
    middleware::{logging_middleware, request_id_middleware},
    routes::{self, galas, health, performers, programs, view_models},
    state::AppState,
};
use axum::{http::HeaderValue, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document of the REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gala Catalog API",
        version = "1.0.0",
        description = "REST API for galas, their programs and performers",
        license(name = "MIT"),
    ),
    paths(
        health::health,
        health::ready,
        galas::create_gala,
        galas::list_galas,
        galas::get_gala,
        galas::list_gala_programs,
        galas::list_gala_performers,
        galas::update_gala,
        galas::delete_gala,
        programs::create_program,
        programs::list_programs,
        programs::get_program,
        programs::list_program_performers,
        programs::update_program,
        programs::delete_program,
        performers::create_performer,
        performers::list_performers,
        performers::get_performer,
        performers::update_performer,
        performers::delete_performer,
    ),
    components(schemas(
        health::HealthResponse,
        health::ReadinessResponse,
        health::ReadinessChecks,
        view_models::GalaViewModel,
        view_models::GalaCreation,
        view_models::GalaEdit,
        view_models::ProgramViewModel,
        view_models::ProgramPayload,
        view_models::PerformerViewModel,
        view_models::PerformerPayload,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "galas", description = "Galas, their programs and performers"),
        (name = "programs", description = "Programs and their performers"),
        (name = "performers", description = "Performers"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        // Health check routes
        .merge(routes::health_routes())
        // Resource routes
        .nest("/api", routes::api_routes())
        .with_state(state);

    if config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app.layer(
        ServiceBuilder::new()
            // Tracing
            .layer(TraceLayer::new_for_http())
            // Compression
            .layer(CompressionLayer::new())
            // CORS
            .layer(build_cors_layer(&config))
            // Timeout
            .layer(TimeoutLayer::new(config.request_timeout()))
            // Custom middleware
            .layer(middleware::from_fn(request_id_middleware))
            .layer(middleware::from_fn(logging_middleware)),
    )
}

/// Build CORS layer from configuration
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_resource_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/galas",
            "/api/galas/{galaId}",
            "/api/galas/{galaId}/programs",
            "/api/galas/{galaId}/performers",
            "/api/programs",
            "/api/programs/{programId}/performers",
            "/api/performers/{performerId}",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
