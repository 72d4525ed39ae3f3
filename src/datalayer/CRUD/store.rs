use async_trait::async_trait;

use crate::datalayer::CRUD::helper::object_id::ObjectId;
use crate::datalayer::CRUD::types::{Bottle, BottlePatch, DeleteResult, NewBottle, UpdateResult};
use crate::errors::DbError;

/// Collection-scoped operations on the bottles collection.
///
/// Each call is a single atomic storage operation. Implementations decide how
/// concurrent writers are serialized; the last write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BottleStore: Send + Sync {
    /// Insert a record, assigning it a fresh identifier.
    /// `None` means the store accepted the call but returned no record.
    async fn insert_one(&self, bottle: NewBottle) -> Result<Option<Bottle>, DbError>;

    /// All records in creation order
    async fn find(&self) -> Result<Vec<Bottle>, DbError>;

    async fn find_one(&self, id: &ObjectId) -> Result<Option<Bottle>, DbError>;

    /// Apply `patch` to the record with `id`. A record whose values are
    /// unchanged by the patch is not counted as modified.
    async fn update_one(&self, id: &ObjectId, patch: BottlePatch) -> Result<UpdateResult, DbError>;

    async fn delete_one(&self, id: &ObjectId) -> Result<DeleteResult, DbError>;

    /// Round-trip to the backend, used by the health endpoints
    async fn ping(&self) -> Result<(), DbError>;

    fn backend(&self) -> &'static str;
}
