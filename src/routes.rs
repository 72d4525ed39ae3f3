use axum::{Router, middleware, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{bottles, health};
use crate::middleware::{error_logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Create the main application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Bottle routes - /api/v1/bottle
    let bottle_routes = Router::new()
        .route(
            "/api/v1/bottle",
            get(bottles::get_all_bottles)
                .post(bottles::add_bottle)
                .put(bottles::update_bottle)
                .delete(bottles::delete_bottle),
        )
        .route("/api/v1/bottle/:bottle_id", get(bottles::get_bottle_details));

    // The last layer added runs first; the error logger needs the request id
    Router::new()
        .merge(health_routes)
        .merge(bottle_routes)
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
