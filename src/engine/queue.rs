//! Queued firing: the ordering discipline for fire requests.

use crate::core::EntityKey;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// How concurrent fire requests are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringMode {
    /// One global FIFO queue. A request runs to completion before the next
    /// one starts, whatever entity either targets.
    #[default]
    Queued,

    /// One FIFO queue per entity key. Requests for the same entity are
    /// totally ordered; requests for different entities may overlap.
    ///
    /// A key's queue exists only while a request for it is running or
    /// waiting, so idle entities cost nothing here.
    PerEntity,
}

/// The queue itself.
///
/// Both modes are built on `tokio::sync::Mutex`, which grants the lock in
/// the order it was requested.
pub(crate) enum FireQueue<K: EntityKey> {
    Global(Arc<Mutex<()>>),
    PerEntity(Arc<Lanes<K>>),
}

type Lanes<K> = DashMap<K, Arc<Mutex<()>>>;

/// A turn in the queue. The next request proceeds when this is dropped.
pub(crate) struct Slot<K: EntityKey> {
    guard: Option<OwnedMutexGuard<()>>,
    lane: Option<(Arc<Lanes<K>>, K)>,
}

impl<K: EntityKey> Drop for Slot<K> {
    fn drop(&mut self) {
        // Release the lock first so the map holds the last reference to an
        // idle lane.
        drop(self.guard.take());
        if let Some((lanes, key)) = self.lane.take() {
            lanes.remove_if(&key, |_, lane| Arc::strong_count(lane) == 1);
        }
    }
}

impl<K: EntityKey> FireQueue<K> {
    pub(crate) fn new(mode: FiringMode) -> Self {
        match mode {
            FiringMode::Queued => Self::Global(Arc::new(Mutex::new(()))),
            FiringMode::PerEntity => Self::PerEntity(Arc::new(DashMap::new())),
        }
    }

    pub(crate) fn mode(&self) -> FiringMode {
        match self {
            Self::Global(_) => FiringMode::Queued,
            Self::PerEntity(_) => FiringMode::PerEntity,
        }
    }

    /// Wait for this request's turn.
    pub(crate) async fn enter(&self, key: &K) -> Slot<K> {
        match self {
            Self::Global(lane) => Slot {
                guard: Some(Arc::clone(lane).lock_owned().await),
                lane: None,
            },
            Self::PerEntity(lanes) => {
                // The shard reference must not be held across the await below.
                let lane = Arc::clone(lanes.entry(key.clone()).or_default().value());
                // Built before the await so a cancelled wait still prunes.
                let mut slot = Slot {
                    guard: None,
                    lane: Some((Arc::clone(lanes), key.clone())),
                };
                slot.guard = Some(lane.lock_owned().await);
                slot
            }
        }
    }

    /// Number of entity lanes currently allocated.
    #[cfg(test)]
    fn lane_count(&self) -> usize {
        match self {
            Self::Global(_) => 1,
            Self::PerEntity(lanes) => lanes.len(),
        }
    }
}
