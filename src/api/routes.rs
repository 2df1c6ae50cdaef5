use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Profile and session
        .route(
            "/profile",
            get(handlers::get_profile)
                .post(handlers::register)
                .delete(handlers::logout),
        )
        // Saved movies
        .route("/saved", get(handlers::get_saved))
        .route(
            "/saved/:movie_id",
            post(handlers::save).delete(handlers::unsave),
        )
        // Search telemetry
        .route("/searches", post(handlers::record_search))
        .route("/trending", get(handlers::trending))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
