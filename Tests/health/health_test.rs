use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bottle_api::controllayer::health::{HealthResponse, health_check, liveness, readiness};
use bottle_api::datalayer::CRUD::{
    BottleStore, InMemoryBottleStore,
    helper::object_id::ObjectId,
    types::{Bottle, BottlePatch, DeleteResult, NewBottle, UpdateResult},
};
use bottle_api::errors::DbError;
use bottle_api::routes::create_router;
use bottle_api::state::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Store that cannot be reached
struct UnreachableStore;

#[async_trait]
impl BottleStore for UnreachableStore {
    async fn insert_one(&self, _bottle: NewBottle) -> Result<Option<Bottle>, DbError> {
        Err(DbError::ConnectionError)
    }

    async fn find(&self) -> Result<Vec<Bottle>, DbError> {
        Err(DbError::ConnectionError)
    }

    async fn find_one(&self, _id: &ObjectId) -> Result<Option<Bottle>, DbError> {
        Err(DbError::ConnectionError)
    }

    async fn update_one(&self, _id: &ObjectId, _patch: BottlePatch) -> Result<UpdateResult, DbError> {
        Err(DbError::ConnectionError)
    }

    async fn delete_one(&self, _id: &ObjectId) -> Result<DeleteResult, DbError> {
        Err(DbError::ConnectionError)
    }

    async fn ping(&self) -> Result<(), DbError> {
        Err(DbError::ConnectionError)
    }

    fn backend(&self) -> &'static str {
        "unreachable"
    }
}

/// Helper function to create a test router with health endpoints
fn create_test_router(store: Arc<dyn BottleStore>) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/health/live", axum::routing::get(liveness))
        .route("/health/ready", axum::routing::get(readiness))
        .with_state(AppState::new(store))
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check_returns_200() {
    let app = create_test_router(Arc::new(InMemoryBottleStore::new()));

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_check_response_structure() {
    let app = create_test_router(Arc::new(InMemoryBottleStore::new()));

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health_response: HealthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health_response.status, "healthy");
    assert_eq!(health_response.version, env!("CARGO_PKG_VERSION"));
    assert!(health_response.timestamp > 0);
    assert_eq!(health_response.storage.backend, "memory");
    assert_eq!(health_response.storage.status, "healthy");
    assert!(health_response.storage.latency_ms.is_some());
}

#[tokio::test]
async fn test_health_check_unreachable_store() {
    let app = create_test_router(Arc::new(UnreachableStore));

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health_response: HealthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health_response.status, "unhealthy");
    assert_eq!(health_response.storage.backend, "unreachable");
    assert!(health_response.storage.latency_ms.is_none());
}

#[tokio::test]
async fn test_liveness_ignores_storage() {
    let app = create_test_router(Arc::new(UnreachableStore));

    let response = get(app, "/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness() {
    let ready = create_test_router(Arc::new(InMemoryBottleStore::new()));
    assert_eq!(get(ready, "/health/ready").await.status(), StatusCode::OK);

    let not_ready = create_test_router(Arc::new(UnreachableStore));
    assert_eq!(
        get(not_ready, "/health/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_full_router_serves_health() {
    let app = create_router(AppState::new(Arc::new(InMemoryBottleStore::new())));

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
