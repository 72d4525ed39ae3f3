use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: i64,
    pub storage: StorageHealth,
}

/// Storage health status
#[derive(Debug, Serialize, Deserialize)]
pub struct StorageHealth {
    pub backend: String,
    pub status: String,
    pub latency_ms: Option<u64>,
}

async fn check_storage(state: &AppState) -> StorageHealth {
    let started = Instant::now();
    let backend = state.store.backend().to_string();

    match state.store.ping().await {
        Ok(()) => StorageHealth {
            backend,
            status: "healthy".to_string(),
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            warn!(backend = %backend, error = %e, "Storage ping failed");
            StorageHealth {
                backend,
                status: "unhealthy".to_string(),
                latency_ms: None,
            }
        }
    }
}

/// Health check endpoint handler
///
/// Returns 200 OK if the store answers a ping
/// Returns 503 Service Unavailable otherwise
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage = check_storage(&state).await;
    let healthy = storage.latency_ms.is_some();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        storage,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness endpoint
///
/// Returns 200 OK while the process is serving requests
pub async fn liveness() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness endpoint
///
/// 503 until the store can be reached
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            warn!(error = %e, "Not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
