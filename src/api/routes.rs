//! Route definitions for the API.

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_small_file, handlers::health_check),
    components(schemas(
        crate::api::types::RestResult,
        crate::api::types::HealthResponse,
    )),
    tags(
        (name = "small_files", description = "Small file download for cluster nodes"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Small File Server API",
        version = "0.1.0",
        description = "Serves registered small files to cluster nodes holding the cluster token",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
///
/// Authentication is per request through the cluster token, so there is no
/// auth middleware layer. There is no CORS layer either: it would answer
/// OPTIONS itself and keep it from reaching the method check.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/get_small_file", any(handlers::get_small_file))
        .route("/api/health", get(handlers::health_check))
        .with_state(state)
        // OpenAPI docs
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
}
