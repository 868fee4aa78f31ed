//! Per-listing coordination of engagement requests
//!
//! The probe performs a real like/unlike before settling, so anything else
//! touching the same listing's like relation while it runs would interleave
//! on the server. Controllers sharing a registry get two guarantees:
//!
//! - at most one probe per listing is running ([`InFlightRegistry::try_begin`])
//! - probes and user actions on one listing never overlap
//!   ([`InFlightRegistry::exclusive`])

use dashmap::{DashMap, DashSet};
use popstore_model::ListingId;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    active: Arc<DashSet<ListingId>>,
    lanes: Arc<DashMap<ListingId, Arc<Mutex<()>>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`. Returns `None` when a probe for it is already running.
    pub fn try_begin(&self, id: ListingId) -> Option<InFlightGuard> {
        if self.active.insert(id) {
            Some(InFlightGuard {
                id,
                active: Arc::clone(&self.active),
            })
        } else {
            None
        }
    }

    pub fn is_in_flight(&self, id: ListingId) -> bool {
        self.active.contains(&id)
    }

    /// Wait until no other probe or action on `id` is running, then hold
    /// the listing until the returned guard drops.
    pub async fn exclusive(&self, id: ListingId) -> OwnedMutexGuard<()> {
        let lane = Arc::clone(self.lanes.entry(id).or_default().value());
        lane.lock_owned().await
    }
}

/// Releases the claim on drop, including when the probe future is dropped
/// mid-flight.
#[derive(Debug)]
pub struct InFlightGuard {
    id: ListingId,
    active: Arc<DashSet<ListingId>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.remove(&self.id);
    }
}
