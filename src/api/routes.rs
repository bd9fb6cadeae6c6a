//! API route definitions
//!
//! - /game/:game_id/metrics - Population-level metrics for a game
//! - /hello, /p_hello/:name - Hello endpoints (GET, POST, PUT)
//! - /health - Liveness

use axum::{routing::get, Router};

use super::handlers::{self, GatewayState};

/// Create all API routes
pub fn api_routes(state: GatewayState) -> Router {
    Router::new()
        .route("/game/:game_id/metrics", get(handlers::get_population_metrics))
        .route(
            "/hello",
            get(handlers::hello).post(handlers::hello).put(handlers::hello),
        )
        .route(
            "/p_hello/:name",
            get(handlers::hello_name)
                .post(handlers::hello_name)
                .put(handlers::hello_name),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
