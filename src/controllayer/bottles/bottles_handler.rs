use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::controllayer::bottles::bottles_service::BottleService;
use crate::controllayer::bottles::viewmodels::{AddBottle, BottleIdentifier, UpdateBottle};
use crate::controllayer::envelope::ApiResponse;
use crate::controllayer::validation::validate_and_convert;
use crate::errors::ServiceResult;

/// Wrap a service result in the response envelope
fn respond<T: Serialize>(result: ServiceResult<T>) -> Response {
    match result {
        Ok(data) => ApiResponse::ok(data).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Validate a raw body as `AddBottle` and insert it.
///
/// Validation failures never reach storage.
#[instrument(skip(service, body))]
pub async fn add_bottle(service: &BottleService, body: &Value) -> Response {
    let result = async {
        let model: AddBottle = validate_and_convert(body)?;
        service.add_bottle(model).await
    }
    .await;

    respond(result)
}

#[instrument(skip(service, body))]
pub async fn update_bottle(service: &BottleService, body: &Value) -> Response {
    let result = async {
        let model: UpdateBottle = validate_and_convert(body)?;
        service.update_bottle(model).await
    }
    .await;

    respond(result)
}

#[instrument(skip(service, body))]
pub async fn delete_bottle(service: &BottleService, body: &Value) -> Response {
    let result = async {
        let model: BottleIdentifier = validate_and_convert(body)?;
        service.delete_bottle(model).await
    }
    .await;

    respond(result)
}

/// The path segment goes through the same `bottle_id` check as a body would
#[instrument(skip(service))]
pub async fn get_bottle_details(service: &BottleService, bottle_id: &str) -> Response {
    let result = async {
        let model: BottleIdentifier = validate_and_convert(&json!({ "bottle_id": bottle_id }))?;
        service.get_bottle_details(model).await
    }
    .await;

    respond(result)
}

#[instrument(skip(service))]
pub async fn get_all_bottles(service: &BottleService) -> Response {
    respond(service.get_all_bottles().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalayer::CRUD::store::MockBottleStore;
    use axum::http::StatusCode;
    use std::sync::Arc;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_body_never_reaches_store() {
        let mut store = MockBottleStore::new();
        store.expect_insert_one().times(0);
        let service = BottleService::new(Arc::new(store));

        let response = add_bottle(&service, &json!({"name": "Gin"})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["status_code"], 400);
        assert!(body["errors"]["brand"].is_array());
        assert!(body["errors"]["capacity"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_path_id_never_reaches_store() {
        let mut store = MockBottleStore::new();
        store.expect_find_one().times(0);
        let service = BottleService::new(Arc::new(store));

        let response = get_bottle_details(&service, "abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["errors"]["bottle_id"].is_array());
    }

    #[tokio::test]
    async fn test_get_all_envelope() {
        let mut store = MockBottleStore::new();
        store.expect_find().times(1).returning(|| Ok(vec![]));
        let service = BottleService::new(Arc::new(store));

        let response = get_all_bottles(&service).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status_code": 200, "success": true, "data": []})
        );
    }
}
