//! Registry state and role-filtered views

use crate::auth::{Capability, Identity, Role};
use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};
use crate::core::time::Clock;
use crate::core::types::ServicePointId;
use crate::core::validation;
use crate::queue::{QueueError, QueueResult};
use crate::registry::point::{PointConfig, ServicePoint};
use crate::store::StoreError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

pub struct ServicePointRegistry {
    points: RwLock<HashMap<ServicePointId, ServicePoint>>,
    next_point_id: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl ServicePointRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            points: RwLock::new(HashMap::new()),
            next_point_id: AtomicU64::new(1),
            clock,
        }
    }

    /// Create a service point owned by the calling staff member
    pub fn create(
        &self,
        identity: &Identity,
        name: &str,
        description: &str,
        location: &str,
        config: PointConfig,
    ) -> QueueResult<ServicePoint> {
        identity.require(Capability::ManageOwnServicePoints)?;
        let name = validation::validate_point_name(name).map_err(QueueError::Validation)?;
        if let Some(limit) = config.max_queue_length {
            validation::validate_max_queue_length(limit).map_err(QueueError::Validation)?;
        }

        let point = ServicePoint {
            id: ServicePointId(self.next_point_id.fetch_add(1, Ordering::SeqCst)),
            name,
            description: description.to_string(),
            location: location.to_string(),
            active: true,
            owner: identity.user_id,
            created_at: self.clock.now(),
            config,
        };

        let mut points = self.write_points()?;
        points.insert(point.id, point.clone());
        log::info!("Service point {} ('{}') created", point.id, point.name);
        Ok(point)
    }

    /// Look up a point regardless of its active flag
    pub fn point(&self, id: ServicePointId) -> QueueResult<Option<ServicePoint>> {
        let points = self.read_points()?;
        Ok(points.get(&id).cloned())
    }

    /// Look up a point only if it is currently active
    pub fn active_point(&self, id: ServicePointId) -> QueueResult<Option<ServicePoint>> {
        let points = self.read_points()?;
        Ok(points.get(&id).filter(|point| point.active).cloned())
    }

    /// Mark a point inactive; the record persists for history
    ///
    /// Idempotent: deactivating an already-inactive point succeeds. Callers
    /// wanting the entry cascade go through `QueueEngine::close_point`, which
    /// abandons the active entries before calling this.
    pub fn deactivate(&self, id: ServicePointId) -> QueueResult<ServicePoint> {
        let mut points = self.write_points()?;
        let point = points
            .get_mut(&id)
            .ok_or_else(|| QueueError::NotFound(format!("Service point {} not found", id)))?;
        point.active = false;
        log::info!("Service point {} deactivated", id);
        Ok(point.clone())
    }

    /// Administrative hard delete of an inactive point
    pub fn remove(&self, id: ServicePointId) -> QueueResult<ServicePoint> {
        let mut points = self.write_points()?;
        if points
            .get(&id)
            .ok_or_else(|| QueueError::NotFound(format!("Service point {} not found", id)))?
            .active
        {
            return Err(QueueError::Conflict(
                "Service point must be deactivated before it can be purged".to_string(),
            ));
        }
        let removed = points
            .remove(&id)
            .ok_or_else(|| QueueError::NotFound(format!("Service point {} not found", id)))?;
        log::warn!("Service point {} purged", id);
        Ok(removed)
    }

    /// Role-filtered listing: staff see only self-owned points (active or
    /// not), every other role sees all active points system-wide
    pub fn list_for(&self, identity: &Identity) -> QueueResult<Vec<ServicePoint>> {
        let points = self.read_points()?;
        let mut listed: Vec<ServicePoint> = match identity.role {
            Role::Staff => points
                .values()
                .filter(|point| point.owner == identity.user_id)
                .cloned()
                .collect(),
            Role::Customer => points.values().filter(|point| point.active).cloned().collect(),
        };
        listed.sort_by_key(|point| point.id);
        Ok(listed)
    }

    /// Unauthenticated public listing: the same active-only set customers see
    pub fn list_public(&self) -> QueueResult<Vec<ServicePoint>> {
        let points = self.read_points()?;
        let mut listed: Vec<ServicePoint> =
            points.values().filter(|point| point.active).cloned().collect();
        listed.sort_by_key(|point| point.id);
        Ok(listed)
    }

    fn read_points(
        &self,
    ) -> QueueResult<std::sync::RwLockReadGuard<'_, HashMap<ServicePointId, ServicePoint>>> {
        handle_rwlock_read(self.points.read(), |msg| {
            QueueError::Store(StoreError::LockPoisoned(msg))
        })
    }

    fn write_points(
        &self,
    ) -> QueueResult<std::sync::RwLockWriteGuard<'_, HashMap<ServicePointId, ServicePoint>>> {
        handle_rwlock_write(self.points.write(), |msg| {
            QueueError::Store(StoreError::LockPoisoned(msg))
        })
    }
}
