use std::sync::Arc;

use crate::config::Config;
use crate::store::MemoryTripStore;
use crate::tracking::coordinator::ProgressCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    coordinator: Arc<ProgressCoordinator<MemoryTripStore>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = MemoryTripStore::new(config.trip_ttl);
        let coordinator = ProgressCoordinator::new(store, config.tracking.clone());
        Self {
            config,
            coordinator: Arc::new(coordinator),
        }
    }

    pub fn coordinator(&self) -> &ProgressCoordinator<MemoryTripStore> {
        &self.coordinator
    }

    pub fn evict_expired(&self) {
        self.coordinator.store().evict_expired();
        self.coordinator.prune_locks();
    }
}
