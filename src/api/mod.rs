//! REST API module using Axum
//!
//! Provides the gateway's HTTP surface:
//! - `/game/:game_id/metrics` population metrics, wrapped in [`envelope::ResponseEnvelope`]
//! - `/hello` and `/p_hello/:name` smoke-test endpoints
//! - `/health` liveness

pub mod envelope;
pub mod handlers;
pub mod params;
mod routes;

pub use handlers::GatewayState;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::defaults::CORS_ORIGINS_ENV_VAR;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `GATEWAY_CORS_ORIGINS` to a comma-separated list of allowed origins
/// (e.g., `https://dashboard.example.org`).
fn build_cors_layer() -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match std::env::var(CORS_ORIGINS_ENV_VAR) {
        Ok(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            layer.allow_origin(allowed)
        }
        // No cross-origin allowed
        Err(_) => layer,
    }
}

/// Create the complete application router.
pub fn create_app(state: GatewayState) -> Router {
    Router::new()
        .merge(routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer())
}
