use opentelemetry::KeyValue;
use opentelemetry::metrics::Counter;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::controllayer::bottles::viewmodels::{AddBottle, BottleIdentifier, UpdateBottle};
use crate::controllayer::envelope::{DeletedResponse, UpdatedResponse};
use crate::datalayer::CRUD::store::BottleStore;
use crate::datalayer::CRUD::types::Bottle;
use crate::errors::{Operation, ServiceError, ServiceResult};
use crate::logging::create_counter;

/// Bottle operations over an injected store.
///
/// Every operation issues exactly one storage call. Storage faults become
/// `ServiceError::DatabaseError` (500); a call that succeeds but touches
/// nothing becomes a 400-class business error.
#[derive(Clone)]
pub struct BottleService {
    store: Arc<dyn BottleStore>,
    operations: Counter<u64>,
}

impl BottleService {
    pub fn new(store: Arc<dyn BottleStore>) -> Self {
        Self {
            store,
            operations: create_counter(
                "bottle_operations_total",
                "Bottle operations by operation and outcome",
            ),
        }
    }

    fn record<T>(&self, operation: &'static str, result: &ServiceResult<T>) {
        let outcome = match result {
            Ok(_) => "success",
            Err(err @ ServiceError::DatabaseError { reason, .. }) => {
                error!(operation, reason = %reason, code = err.error_code(), "Storage call failed");
                err.error_code()
            }
            Err(err) => {
                warn!(operation, code = err.error_code(), "Operation rejected");
                err.error_code()
            }
        };

        self.operations.add(
            1,
            &[
                KeyValue::new("operation", operation),
                KeyValue::new("outcome", outcome),
            ],
        );
    }

    /// Insert a new bottle and return it with its generated identifier
    #[instrument(skip(self, model), fields(name = %model.name, brand = %model.brand))]
    pub async fn add_bottle(&self, model: AddBottle) -> ServiceResult<Bottle> {
        let result = match self.store.insert_one(model.into()).await {
            Ok(Some(bottle)) => {
                info!(bottle_id = %bottle.id, "Bottle created");
                Ok(bottle)
            }
            Ok(None) => Err(ServiceError::OperationFailed(Operation::Add)),
            Err(e) => Err(ServiceError::database(Operation::Add, e)),
        };

        self.record(Operation::Add.as_str(), &result);
        result
    }

    /// Apply the supplied fields to an existing bottle.
    ///
    /// A request carrying no fields succeeds without touching storage. A
    /// request whose values match what is stored modifies nothing and is
    /// reported as a failure, like an unknown identifier.
    #[instrument(skip(self, model), fields(bottle_id = %model.bottle_id))]
    pub async fn update_bottle(&self, model: UpdateBottle) -> ServiceResult<UpdatedResponse> {
        let patch = model.patch();
        if patch.is_empty() {
            info!("Empty patch, nothing to update");
            let result = Ok(UpdatedResponse { updated: true });
            self.record(Operation::Update.as_str(), &result);
            return result;
        }

        let result = match self.store.update_one(&model.bottle_id, patch).await {
            Ok(update) if update.modified_count > 0 => Ok(UpdatedResponse { updated: true }),
            Ok(_) => Err(ServiceError::OperationFailed(Operation::Update)),
            Err(e) => Err(ServiceError::database(Operation::Update, e)),
        };

        self.record(Operation::Update.as_str(), &result);
        result
    }

    #[instrument(skip(self, model), fields(bottle_id = %model.bottle_id))]
    pub async fn delete_bottle(&self, model: BottleIdentifier) -> ServiceResult<DeletedResponse> {
        let result = match self.store.delete_one(&model.bottle_id).await {
            Ok(delete) if delete.deleted_count > 0 => Ok(DeletedResponse { deleted: true }),
            Ok(_) => Err(ServiceError::OperationFailed(Operation::Delete)),
            Err(e) => Err(ServiceError::database(Operation::Delete, e)),
        };

        self.record(Operation::Delete.as_str(), &result);
        result
    }

    #[instrument(skip(self, model), fields(bottle_id = %model.bottle_id))]
    pub async fn get_bottle_details(&self, model: BottleIdentifier) -> ServiceResult<Bottle> {
        let result = match self.store.find_one(&model.bottle_id).await {
            Ok(Some(bottle)) => Ok(bottle),
            Ok(None) => Err(ServiceError::RecordNotFound(Operation::Fetch)),
            Err(e) => Err(ServiceError::database(Operation::Fetch, e)),
        };

        self.record(Operation::Fetch.as_str(), &result);
        result
    }

    /// Every stored bottle; an empty collection is an empty list, not an error
    #[instrument(skip(self))]
    pub async fn get_all_bottles(&self) -> ServiceResult<Vec<Bottle>> {
        let result = self
            .store
            .find()
            .await
            .map_err(|e| ServiceError::database(Operation::Fetch, e));

        if let Ok(bottles) = &result {
            info!(count = bottles.len(), "Fetched bottles");
        }

        self.record("fetch_all", &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalayer::CRUD::helper::object_id::ObjectId;
    use crate::datalayer::CRUD::store::MockBottleStore;
    use crate::datalayer::CRUD::types::{DeleteResult, NewBottle, UpdateResult};
    use crate::errors::DbError;
    use axum::http::StatusCode;

    fn service(store: MockBottleStore) -> BottleService {
        BottleService::new(Arc::new(store))
    }

    fn gin() -> AddBottle {
        AddBottle {
            name: "Gin".to_string(),
            brand: "X".to_string(),
            capacity: 5.0,
        }
    }

    #[tokio::test]
    async fn test_add_returns_stored_record() {
        let mut store = MockBottleStore::new();
        store
            .expect_insert_one()
            .times(1)
            .returning(|new: NewBottle| Ok(Some(new.with_id(ObjectId::new()))));

        let bottle = service(store).add_bottle(gin()).await.unwrap();
        assert_eq!(bottle.name, "Gin");
        assert_eq!(bottle.brand, "X");
        assert_eq!(bottle.capacity, 5.0);
    }

    #[tokio::test]
    async fn test_add_without_result_is_bad_request() {
        let mut store = MockBottleStore::new();
        store.expect_insert_one().returning(|_| Ok(None));

        let err = service(store).add_bottle(gin()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_details()["error"], "On Add Error");
    }

    #[tokio::test]
    async fn test_add_storage_fault_is_server_error() {
        let mut store = MockBottleStore::new();
        store
            .expect_insert_one()
            .returning(|_| Err(DbError::ConnectionError));

        let err = service(store).add_bottle(gin()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_details()["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_empty_update_skips_storage() {
        let mut store = MockBottleStore::new();
        store.expect_update_one().times(0);

        let model = UpdateBottle {
            bottle_id: ObjectId::new(),
            name: None,
            brand: None,
            capacity: None,
        };
        let response = service(store).update_bottle(model).await.unwrap();
        assert!(response.updated);
    }

    #[tokio::test]
    async fn test_update_modifying_nothing_is_bad_request() {
        let mut store = MockBottleStore::new();
        store
            .expect_update_one()
            .times(1)
            .returning(|_, _| Ok(UpdateResult { modified_count: 0 }));

        let model = UpdateBottle {
            bottle_id: ObjectId::new(),
            name: Some("Rum".to_string()),
            brand: None,
            capacity: None,
        };
        let err = service(store).update_bottle(model).await.unwrap_err();
        assert!(matches!(err, ServiceError::OperationFailed(Operation::Update)));
    }

    #[tokio::test]
    async fn test_delete_counts() {
        let mut store = MockBottleStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_delete_one()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(DeleteResult { deleted_count: 1 }));
        store
            .expect_delete_one()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(DeleteResult { deleted_count: 0 }));

        let service = service(store);
        let id = ObjectId::new();

        let deleted = service
            .delete_bottle(BottleIdentifier { bottle_id: id })
            .await
            .unwrap();
        assert!(deleted.deleted);

        let err = service
            .delete_bottle(BottleIdentifier { bottle_id: id })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::OperationFailed(Operation::Delete)));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut store = MockBottleStore::new();
        store.expect_find_one().returning(|_| Ok(None));

        let err = service(store)
            .get_bottle_details(BottleIdentifier {
                bottle_id: ObjectId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_details()["message"], "Record not found.");
        assert_eq!(err.to_details()["error"], "On Fetch Error");
    }

    #[tokio::test]
    async fn test_get_all_empty_is_success() {
        let mut store = MockBottleStore::new();
        store.expect_find().returning(|| Ok(vec![]));

        let bottles = service(store).get_all_bottles().await;
        tokio_test::assert_ok!(&bottles);
        assert!(bottles.unwrap().is_empty());
    }
}
