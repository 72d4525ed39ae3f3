use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::datalayer::CRUD::helper::object_id::ObjectId;
use crate::datalayer::CRUD::store::BottleStore;
use crate::datalayer::CRUD::types::{Bottle, BottlePatch, DeleteResult, NewBottle, UpdateResult};
use crate::errors::DbError;

/// Process-local bottle store.
///
/// Records are keyed by identifier; since identifiers start with their
/// creation second, iteration order follows insertion order.
#[derive(Debug, Default)]
pub struct InMemoryBottleStore {
    records: RwLock<BTreeMap<ObjectId, Bottle>>,
}

impl InMemoryBottleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl BottleStore for InMemoryBottleStore {
    async fn insert_one(&self, bottle: NewBottle) -> Result<Option<Bottle>, DbError> {
        let record = bottle.with_id(ObjectId::new());
        self.records.write().await.insert(record.id, record.clone());
        debug!(bottle_id = %record.id, "Inserted bottle into memory store");
        Ok(Some(record))
    }

    async fn find(&self) -> Result<Vec<Bottle>, DbError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_one(&self, id: &ObjectId) -> Result<Option<Bottle>, DbError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn update_one(&self, id: &ObjectId, patch: BottlePatch) -> Result<UpdateResult, DbError> {
        let mut records = self.records.write().await;
        let modified_count = match records.get_mut(id) {
            Some(record) => u64::from(patch.apply_to(record)),
            None => 0,
        };
        Ok(UpdateResult { modified_count })
    }

    async fn delete_one(&self, id: &ObjectId) -> Result<DeleteResult, DbError> {
        let deleted_count = match self.records.write().await.remove(id) {
            Some(_) => 1,
            None => 0,
        };
        Ok(DeleteResult { deleted_count })
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
