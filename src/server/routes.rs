//! Router configuration for the analysis server.

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::get,
    routing::post,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::AppState;

/// Default path of the analysis endpoint.
pub const DEFAULT_ENDPOINT_PATH: &str = "/analyze-document";

/// Path of the health check route.
pub const HEALTH_PATH: &str = "/health";

/// Check that `path` can be mounted next to the health route.
pub fn validate_endpoint_path(path: &str) -> anyhow::Result<()> {
    if !path.starts_with('/') {
        anyhow::bail!("Endpoint path must start with '/': {:?}", path);
    }
    if path == HEALTH_PATH {
        anyhow::bail!("Endpoint path conflicts with {}", HEALTH_PATH);
    }
    Ok(())
}

/// CORS policy: any origin, with the headers browser clients send.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

/// Create the router with the analysis endpoint mounted at `endpoint_path`.
///
/// The path must pass [`validate_endpoint_path`].
pub fn create_router(state: AppState, endpoint_path: &str) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(handlers::health))
        .route(
            endpoint_path,
            post(handlers::analyze_document).options(handlers::preflight),
        )
        .layer(cors_layer())
        .with_state(state)
}
