//! Router configuration for the API.
//!
//! Public routes: the welcome banner, health probes, `/auth`.
//! Everything under `/books`, `/readers` and `/borrow` requires an access token.

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{auth_middleware, logging_middleware, request_id_middleware};
use crate::config::settings::ServerConfig;
use crate::state::AppState;

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Builds the application router.
///
/// Layers run outermost first: request id, logging, timeout, compression, CORS.
/// The auth layer is a route layer on the protected groups only, so unknown
/// paths still answer 404 rather than 401.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let protected = OpenApiRouter::new()
        .nest("/books", handlers::books::book_routes())
        .nest("/readers", handlers::readers::reader_routes())
        .nest("/borrow", handlers::borrow::borrow_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .nest("/auth", handlers::auth::auth_routes())
        .merge(protected)
        .split_for_parts();

    router
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, api))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout),
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
