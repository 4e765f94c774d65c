//! In-memory [`CanvassStore`] over a [`CanvassSnapshot`].

use async_trait::async_trait;
use canvass_map_canvass_models::{Area, Assignment, CanvassSnapshot, Location};

use crate::{CanvassStore, StoreError};

/// Serves documents straight from a snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: CanvassSnapshot,
}

impl MemoryStore {
    /// Creates a store serving `snapshot`.
    #[must_use]
    pub const fn new(snapshot: CanvassSnapshot) -> Self {
        Self { snapshot }
    }

    /// The snapshot being served.
    #[must_use]
    pub const fn snapshot(&self) -> &CanvassSnapshot {
        &self.snapshot
    }
}

impl From<CanvassSnapshot> for MemoryStore {
    fn from(snapshot: CanvassSnapshot) -> Self {
        Self::new(snapshot)
    }
}

#[async_trait]
impl CanvassStore for MemoryStore {
    async fn get_assignment(&self, id: &str) -> Result<Option<Assignment>, StoreError> {
        Ok(self.snapshot.assignments.iter().find(|a| a.id == id).cloned())
    }

    async fn get_area(&self, id: &str) -> Result<Option<Area>, StoreError> {
        Ok(self.snapshot.areas.iter().find(|a| a.id == id).cloned())
    }

    async fn list_locations(&self, org_id: i64) -> Result<Vec<Location>, StoreError> {
        Ok(self
            .snapshot
            .locations
            .iter()
            .filter(|l| l.org_id == org_id)
            .cloned()
            .collect())
    }
}
