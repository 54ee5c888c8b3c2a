// CORS configuration
// Applied over the full router in main.rs via tower-http's CORS layer.

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// Permissive for "*", otherwise restricted to the configured origins. The
/// pagination headers are exposed so the dashboard can read them.
pub fn apply_cors(router: Router, allowed_origins: &[String]) -> Router {
    let layer = if allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    router.layer(layer.allow_methods(Any).allow_headers(Any).expose_headers(Any))
}
