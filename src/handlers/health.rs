use crate::controllayer::health;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use tracing::{info, instrument};

#[instrument(skip_all, fields(service = "health_check"))]
pub async fn health_check(state: State<AppState>) -> impl IntoResponse {
    info!("Health check request received");
    health::health_check(state).await
}

#[instrument(fields(service = "liveness"))]
pub async fn liveness() -> impl IntoResponse {
    health::liveness().await
}

#[instrument(skip_all, fields(service = "readiness"))]
pub async fn readiness(state: State<AppState>) -> impl IntoResponse {
    health::readiness(state).await
}
