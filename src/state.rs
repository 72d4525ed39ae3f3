use std::sync::Arc;

use crate::controllayer::bottles::BottleService;
use crate::datalayer::CRUD::store::BottleStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Bottle operations, bound to `store`
    pub bottles: BottleService,
    /// Backing store, also pinged by the health endpoints
    pub store: Arc<dyn BottleStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BottleStore>) -> Self {
        Self {
            bottles: BottleService::new(store.clone()),
            store,
        }
    }
}
