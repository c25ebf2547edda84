//! In-memory entry store
//!
//! Reference implementation of [`EntryStore`] backing tests and single-node
//! deployments. State lives in RwLock-protected maps with an atomic id
//! counter; the per-service-point exclusion scope is a dedicated mutex per
//! point, acquired for every read-modify-write sequence before the shared
//! maps are touched. A database-backed implementation would realise the same
//! scope with a row-level lock on the service point.

use crate::core::sync::{handle_mutex_poison, handle_rwlock_read, handle_rwlock_write};
use crate::core::types::{EntryId, ServicePointId, UserId};
use crate::queue::reconciler;
use crate::store::entry::{EntryStatus, QueueEntry};
use crate::store::error::{StoreError, StoreResult};
use crate::store::traits::{Departure, EntryStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Default)]
struct StoreInner {
    /// Every entry ever created, terminal ones included
    entries: HashMap<EntryId, QueueEntry>,
    /// Join-order history per service point
    by_point: HashMap<ServicePointId, Vec<EntryId>>,
    /// Uniqueness constraint on (user, active-status): updated atomically
    /// with insertion and departure
    active_by_user: HashMap<UserId, EntryId>,
}

pub struct MemoryEntryStore {
    inner: RwLock<StoreInner>,
    /// Per-service-point exclusion scopes; lock order is always point scope
    /// first, then `inner`
    point_locks: Mutex<HashMap<ServicePointId, Arc<Mutex<()>>>>,
    next_entry_id: AtomicU64,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            point_locks: Mutex::new(HashMap::new()),
            next_entry_id: AtomicU64::new(1),
        }
    }

    fn point_guard(&self, point: ServicePointId) -> StoreResult<Arc<Mutex<()>>> {
        let mut locks = handle_mutex_poison(self.point_locks.lock(), StoreError::LockPoisoned)?;
        Ok(Arc::clone(
            locks.entry(point).or_insert_with(|| Arc::new(Mutex::new(()))),
        ))
    }

    /// Active entries at `point` in join order (history order restricted to
    /// active statuses)
    fn active_at<'a>(inner: &'a StoreInner, point: ServicePointId) -> Vec<&'a QueueEntry> {
        inner
            .by_point
            .get(&point)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.entries.get(id))
            .filter(|entry| entry.is_active())
            .collect()
    }
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryEntryStore {
    fn insert(
        &self,
        point: ServicePointId,
        user: UserId,
        priority_level: Option<u8>,
        minutes_per_visitor: i64,
        capacity: Option<u32>,
        now: DateTime<Utc>,
    ) -> StoreResult<QueueEntry> {
        let guard = self.point_guard(point)?;
        let _scope = handle_mutex_poison(guard.lock(), StoreError::LockPoisoned)?;
        let mut inner = handle_rwlock_write(self.inner.write(), StoreError::LockPoisoned)?;
        let inner = &mut *inner;

        if inner.active_by_user.contains_key(&user) {
            return Err(StoreError::DuplicateActiveEntry { user });
        }

        let active = Self::active_at(inner, point).len() as u32;
        if let Some(limit) = capacity {
            if active >= limit {
                return Err(StoreError::CapacityExceeded { point, limit });
            }
        }

        let id = EntryId(self.next_entry_id.fetch_add(1, Ordering::SeqCst));
        let entry = QueueEntry {
            id,
            service_point_id: point,
            user_id: user,
            position: active + 1,
            status: EntryStatus::Joined,
            joined_at: now,
            called_at: None,
            served_at: None,
            priority_level,
            estimated_wait_minutes: Some(i64::from(active) * minutes_per_visitor),
        };

        inner.entries.insert(id, entry.clone());
        inner.by_point.entry(point).or_default().push(id);
        inner.active_by_user.insert(user, id);

        log::trace!("Inserted {} at {} position {}", id, point, entry.position);
        Ok(entry)
    }

    fn entry(&self, id: EntryId) -> StoreResult<Option<QueueEntry>> {
        let inner = handle_rwlock_read(self.inner.read(), StoreError::LockPoisoned)?;
        Ok(inner.entries.get(&id).cloned())
    }

    fn active_entries(&self, point: ServicePointId) -> StoreResult<Vec<QueueEntry>> {
        let inner = handle_rwlock_read(self.inner.read(), StoreError::LockPoisoned)?;
        let mut entries: Vec<QueueEntry> = Self::active_at(&inner, point)
            .into_iter()
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.rank_key());
        Ok(entries)
    }

    fn active_count(&self, point: ServicePointId) -> StoreResult<u32> {
        let inner = handle_rwlock_read(self.inner.read(), StoreError::LockPoisoned)?;
        Ok(Self::active_at(&inner, point).len() as u32)
    }

    fn active_entry_for_user(&self, user: UserId) -> StoreResult<Option<QueueEntry>> {
        let inner = handle_rwlock_read(self.inner.read(), StoreError::LockPoisoned)?;
        Ok(inner
            .active_by_user
            .get(&user)
            .and_then(|id| inner.entries.get(id))
            .cloned())
    }

    fn call_next(
        &self,
        points: &[ServicePointId],
        now: DateTime<Utc>,
    ) -> StoreResult<Option<QueueEntry>> {
        loop {
            // Select the best candidate across all points without any point
            // scope held, then claim it under its point's scope.
            let candidate = {
                let inner = handle_rwlock_read(self.inner.read(), StoreError::LockPoisoned)?;
                let mut best: Option<QueueEntry> = None;
                for &point in points {
                    for entry in Self::active_at(&inner, point) {
                        if entry.status != EntryStatus::Joined {
                            continue;
                        }
                        if best
                            .as_ref()
                            .map_or(true, |current| entry.rank_key() < current.rank_key())
                        {
                            best = Some(entry.clone());
                        }
                    }
                }
                best
            };

            let Some(candidate) = candidate else {
                return Ok(None);
            };

            let guard = self.point_guard(candidate.service_point_id)?;
            let _scope = handle_mutex_poison(guard.lock(), StoreError::LockPoisoned)?;
            let mut inner = handle_rwlock_write(self.inner.write(), StoreError::LockPoisoned)?;

            match inner.entries.get_mut(&candidate.id) {
                Some(entry) if entry.status == EntryStatus::Joined => {
                    entry.status = EntryStatus::Called;
                    entry.called_at = Some(now);
                    log::trace!("Called {} at {}", entry.id, entry.service_point_id);
                    return Ok(Some(entry.clone()));
                }
                // The candidate changed under us (another staff action won);
                // select again from the current state.
                _ => continue,
            }
        }
    }

    fn depart(
        &self,
        id: EntryId,
        to: EntryStatus,
        expected_from: &[EntryStatus],
        now: DateTime<Utc>,
    ) -> StoreResult<Departure> {
        debug_assert!(to.is_terminal(), "depart target must be terminal");

        let point = {
            let inner = handle_rwlock_read(self.inner.read(), StoreError::LockPoisoned)?;
            inner
                .entries
                .get(&id)
                .ok_or(StoreError::EntryNotFound { entry: id })?
                .service_point_id
        };

        let guard = self.point_guard(point)?;
        let _scope = handle_mutex_poison(guard.lock(), StoreError::LockPoisoned)?;
        let mut inner = handle_rwlock_write(self.inner.write(), StoreError::LockPoisoned)?;
        let inner = &mut *inner;

        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or(StoreError::EntryNotFound { entry: id })?;
        if !expected_from.contains(&entry.status) {
            return Err(StoreError::TransitionConflict {
                entry: id,
                actual: entry.status,
                expected: expected_from.to_vec(),
            });
        }

        entry.status = to;
        if to == EntryStatus::Served {
            entry.served_at = Some(now);
        }
        let departed = entry.clone();
        inner.active_by_user.remove(&departed.user_id);

        // Close the gap the departure left, preserving relative order
        let remaining: Vec<(EntryId, u32)> = Self::active_at(inner, point)
            .into_iter()
            .map(|entry| (entry.id, entry.position))
            .collect();
        let positions: Vec<u32> = remaining.iter().map(|&(_, position)| position).collect();
        let compacted = reconciler::compact(&positions);

        let mut repositioned = Vec::new();
        for ((entry_id, old_position), new_position) in remaining.into_iter().zip(compacted) {
            if new_position != old_position {
                if let Some(entry) = inner.entries.get_mut(&entry_id) {
                    entry.position = new_position;
                    repositioned.push(entry.clone());
                }
            }
        }

        debug_assert!(reconciler::is_dense(
            &Self::active_at(inner, point)
                .iter()
                .map(|entry| entry.position)
                .collect::<Vec<_>>()
        ));

        log::trace!(
            "{} departed {} as '{}', {} repositioned",
            departed.id,
            point,
            to,
            repositioned.len()
        );
        Ok(Departure {
            entry: departed,
            repositioned,
        })
    }

    fn abandon_all(
        &self,
        point: ServicePointId,
        _now: DateTime<Utc>,
    ) -> StoreResult<Vec<QueueEntry>> {
        let guard = self.point_guard(point)?;
        let _scope = handle_mutex_poison(guard.lock(), StoreError::LockPoisoned)?;
        let mut inner = handle_rwlock_write(self.inner.write(), StoreError::LockPoisoned)?;
        let inner = &mut *inner;

        let ids: Vec<EntryId> = Self::active_at(inner, point)
            .into_iter()
            .map(|entry| entry.id)
            .collect();

        let mut affected = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entry) = inner.entries.get_mut(&id) {
                entry.status = EntryStatus::Abandoned;
                inner.active_by_user.remove(&entry.user_id);
                affected.push(entry.clone());
            }
        }

        log::debug!("Abandoned {} active entries at {}", affected.len(), point);
        Ok(affected)
    }

    fn entries_for_points(&self, points: &[ServicePointId]) -> StoreResult<Vec<QueueEntry>> {
        let inner = handle_rwlock_read(self.inner.read(), StoreError::LockPoisoned)?;
        let mut entries: Vec<QueueEntry> = points
            .iter()
            .filter_map(|point| inner.by_point.get(point))
            .flatten()
            .filter_map(|id| inner.entries.get(id))
            .cloned()
            .collect();
        entries.sort_by_key(|entry| (entry.joined_at, entry.id));
        Ok(entries)
    }

    fn rank(&self, id: EntryId) -> StoreResult<Option<u32>> {
        let inner = handle_rwlock_read(self.inner.read(), StoreError::LockPoisoned)?;
        let Some(entry) = inner.entries.get(&id) else {
            return Ok(None);
        };
        if !entry.is_active() {
            return Ok(None);
        }

        let mut active = Self::active_at(&inner, entry.service_point_id);
        active.sort_by_key(|entry| entry.rank_key());
        Ok(active
            .iter()
            .position(|candidate| candidate.id == id)
            .map(|index| index as u32 + 1))
    }
}
