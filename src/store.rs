use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::StoreError;
use crate::types::trip::{Phase, TripState};

/// Keyed, TTL-bounded persistence for trip state. An expired entry loads as
/// `None`, never as an error.
pub trait TripStore: Send + Sync + 'static {
    fn init(
        &self,
        trip_id: &str,
        itinerary_index: usize,
        leg_index: usize,
        step_index: Option<usize>,
        phase: Phase,
    ) -> impl Future<Output = Result<TripState, StoreError>> + Send;

    fn load(&self, trip_id: &str) -> impl Future<Output = Result<Option<TripState>, StoreError>> + Send;

    fn save(&self, trip_id: &str, state: &TripState) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Clone)]
pub struct MemoryTripStore {
    trips: Arc<DashMap<String, StoredTrip>>,
    ttl: Duration,
}

struct StoredTrip {
    state: TripState,
    written_at: Instant,
}

impl MemoryTripStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            trips: Arc::new(DashMap::new()),
            ttl,
        }
    }

    fn put(&self, trip_id: &str, state: TripState) {
        self.trips.insert(
            trip_id.to_string(),
            StoredTrip {
                state,
                written_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn evict_expired(&self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.trips
            .retain(|_, stored| now.duration_since(stored.written_at) < ttl);
        tracing::info!("Trip eviction complete. Active trips: {}", self.trips.len());
    }
}

impl TripStore for MemoryTripStore {
    async fn init(
        &self,
        trip_id: &str,
        itinerary_index: usize,
        leg_index: usize,
        step_index: Option<usize>,
        phase: Phase,
    ) -> Result<TripState, StoreError> {
        let state = TripState::new(trip_id, itinerary_index, leg_index, step_index, phase);
        self.put(trip_id, state.clone());
        Ok(state)
    }

    async fn load(&self, trip_id: &str) -> Result<Option<TripState>, StoreError> {
        if let Some(stored) = self.trips.get(trip_id) {
            if stored.written_at.elapsed() < self.ttl {
                return Ok(Some(stored.state.clone()));
            }
        } else {
            return Ok(None);
        }
        self.trips
            .remove_if(trip_id, |_, stored| stored.written_at.elapsed() >= self.ttl);
        Ok(None)
    }

    async fn save(&self, trip_id: &str, state: &TripState) -> Result<(), StoreError> {
        self.put(trip_id, state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_then_load_round_trips() {
        let store = MemoryTripStore::new(Duration::from_secs(60));
        store.init("t-1", 0, 0, Some(0), Phase::Walking).await.expect("init");
        let loaded = store.load("t-1").await.expect("load").expect("present");
        assert_eq!(loaded.trip_id, "t-1");
        assert_eq!(loaded.phase, Phase::Walking);
    }

    #[tokio::test]
    async fn unknown_trip_loads_as_none() {
        let store = MemoryTripStore::new(Duration::from_secs(60));
        assert!(store.load("missing").await.expect("load").is_none());
    }

    #[tokio::test]
    async fn expired_trip_loads_as_none_and_is_dropped() {
        let store = MemoryTripStore::new(Duration::from_millis(10));
        store.init("t-1", 0, 0, None, Phase::Walking).await.expect("init");
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(store.load("t-1").await.expect("load").is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn save_refreshes_ttl() {
        let store = MemoryTripStore::new(Duration::from_millis(300));
        let state = store.init("t-1", 0, 0, None, Phase::Walking).await.expect("init");
        tokio::time::sleep(Duration::from_millis(200)).await;
        store.save("t-1", &state).await.expect("save");
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(store.load("t-1").await.expect("load").is_some());
    }

    #[tokio::test]
    async fn sweep_evicts_only_expired() {
        let store = MemoryTripStore::new(Duration::from_millis(40));
        store.init("old", 0, 0, None, Phase::Walking).await.expect("init");
        tokio::time::sleep(Duration::from_millis(60)).await;
        store.init("new", 0, 0, None, Phase::Walking).await.expect("init");
        store.evict_expired();
        assert_eq!(store.len(), 1);
        assert!(store.load("new").await.expect("load").is_some());
    }
}
