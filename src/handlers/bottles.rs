use axum::{extract::State, response::Response};
use tracing::{info, instrument};

use crate::controllayer::bottles::bottles_handler;
use crate::handlers::extractors::{BottleIdPath, RequestBody};
use crate::state::AppState;

/// POST /api/v1/bottle
/// Create a bottle from `{name, brand, capacity}`, sent as JSON or as a form
#[instrument(skip_all, fields(service = "/api/v1/bottle"))]
pub async fn add_bottle(
    State(state): State<AppState>,
    RequestBody(body): RequestBody,
) -> Response {
    info!("Adding new bottle");
    let response = bottles_handler::add_bottle(&state.bottles, &body).await;

    info!(response_code = %response.status(), "Add bottle completed");
    response
}

/// PUT /api/v1/bottle
/// Partial update; `bottle_id` plus any of `name`, `brand`, `capacity`
#[instrument(skip_all, fields(service = "/api/v1/bottle"))]
pub async fn update_bottle(
    State(state): State<AppState>,
    RequestBody(body): RequestBody,
) -> Response {
    info!(bottle_id = ?body.get("bottle_id"), "Updating bottle");
    let response = bottles_handler::update_bottle(&state.bottles, &body).await;

    info!(response_code = %response.status(), "Update bottle completed");
    response
}

/// DELETE /api/v1/bottle
/// The identifier travels in the body, not the path
#[instrument(skip_all, fields(service = "/api/v1/bottle"))]
pub async fn delete_bottle(
    State(state): State<AppState>,
    RequestBody(body): RequestBody,
) -> Response {
    info!(bottle_id = ?body.get("bottle_id"), "Deleting bottle");
    let response = bottles_handler::delete_bottle(&state.bottles, &body).await;

    info!(response_code = %response.status(), "Delete bottle completed");
    response
}

/// GET /api/v1/bottle/:bottle_id
#[instrument(skip_all, fields(service = "/api/v1/bottle/:bottle_id"))]
pub async fn get_bottle_details(
    State(state): State<AppState>,
    BottleIdPath(bottle_id): BottleIdPath,
) -> Response {
    info!(bottle_id = %bottle_id, "Getting bottle details");
    let response = bottles_handler::get_bottle_details(&state.bottles, &bottle_id).await;

    info!(response_code = %response.status(), "Get bottle completed");
    response
}

/// GET /api/v1/bottle
#[instrument(skip_all, fields(service = "/api/v1/bottle"))]
pub async fn get_all_bottles(State(state): State<AppState>) -> Response {
    info!("Listing bottles");
    let response = bottles_handler::get_all_bottles(&state.bottles).await;

    info!(response_code = %response.status(), "List bottles completed");
    response
}
