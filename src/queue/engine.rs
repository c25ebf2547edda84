//! Queue state machine
//!
//! All transitions for queue entries run through here: join, call-next,
//! dismiss, leave and service point closure. The engine authorises the
//! caller, applies the transition through the entry store (which serialises
//! per service point), and returns the committed result together with the
//! [`PendingEvent`]s describing the fanout still owed. It never performs
//! fanout itself; [`QueueService`](crate::queue::QueueService) hands the
//! events to the dispatcher after the transition has committed.

use crate::auth::{Capability, Identity};
use crate::core::time::Clock;
use crate::core::types::{EntryId, ServicePointId};
use crate::core::validation;
use crate::notifications::PendingEvent;
use crate::queue::analytics::{self, QueueAnalytics};
use crate::queue::error::{QueueError, QueueResult};
use crate::registry::{ServicePoint, ServicePointRegistry};
use crate::store::{Departure, EntryStatus, EntryStore, QueueEntry, StoreError};
use std::sync::Arc;

/// A committed transition plus the fanout it still owes
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub events: Vec<PendingEvent>,
}

impl<T> Committed<T> {
    fn quiet(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
        }
    }
}

pub struct QueueEngine {
    store: Arc<dyn EntryStore>,
    registry: Arc<ServicePointRegistry>,
    clock: Arc<dyn Clock>,
    minutes_per_visitor: i64,
    default_max_queue_length: Option<u32>,
}

impl QueueEngine {
    pub fn new(
        store: Arc<dyn EntryStore>,
        registry: Arc<ServicePointRegistry>,
        clock: Arc<dyn Clock>,
        minutes_per_visitor: i64,
        default_max_queue_length: Option<u32>,
    ) -> Self {
        Self {
            store,
            registry,
            clock,
            minutes_per_visitor,
            default_max_queue_length,
        }
    }

    pub fn registry(&self) -> &Arc<ServicePointRegistry> {
        &self.registry
    }

    /// Join a service point's queue at the tail position
    pub fn join(
        &self,
        identity: &Identity,
        point_id: ServicePointId,
        priority_level: Option<u8>,
    ) -> QueueResult<Committed<QueueEntry>> {
        identity.require(Capability::Join)?;
        let point = self
            .registry
            .active_point(point_id)?
            .ok_or_else(|| QueueError::NotFound("Service point not found or inactive.".to_string()))?;

        let priority_level = match priority_level {
            Some(level) => {
                if !point.config.supports_priority {
                    return Err(QueueError::Validation(format!(
                        "'{}' does not support priority levels",
                        point.name
                    )));
                }
                Some(validation::validate_priority_level(level).map_err(QueueError::Validation)?)
            }
            None => None,
        };

        let capacity = point.config.max_queue_length.or(self.default_max_queue_length);
        let entry = self
            .store
            .insert(
                point.id,
                identity.user_id,
                priority_level,
                self.minutes_per_visitor,
                capacity,
                self.clock.now(),
            )
            .map_err(|e| match e {
                StoreError::DuplicateActiveEntry { .. } => {
                    QueueError::Conflict("You are already in a queue.".to_string())
                }
                StoreError::CapacityExceeded { .. } => {
                    QueueError::Conflict(format!("The queue for '{}' is full.", point.name))
                }
                other => QueueError::Store(other),
            })?;

        log::info!(
            "{} joined {} at position {}",
            entry.user_id,
            point.id,
            entry.position
        );
        let events = vec![
            PendingEvent::notify(
                entry.user_id,
                format!("You joined '{}' at position {}.", point.name, entry.position),
                Some(point.id),
                false,
            ),
            PendingEvent::live_position(entry.position, point.id, entry.user_id),
        ];
        Ok(Committed { value: entry, events })
    }

    /// Call the next waiting visitor across the staff member's points
    ///
    /// With an explicit `point_id` only that point is scanned (and it must be
    /// owned by the caller); otherwise the best-ranked joined entry across all
    /// owned points wins.
    pub fn call_next(
        &self,
        identity: &Identity,
        point_id: Option<ServicePointId>,
    ) -> QueueResult<Committed<QueueEntry>> {
        identity.require(Capability::CallNextOwn)?;
        let points = match point_id {
            Some(id) => {
                self.owned_point(identity, id)?;
                vec![id]
            }
            None => identity.owned_points_sorted(),
        };

        let entry = self
            .store
            .call_next(&points, self.clock.now())?
            .ok_or_else(|| QueueError::NotFound("No customers waiting.".to_string()))?;

        log::info!("{} called at {}", entry.user_id, entry.service_point_id);
        let events = vec![
            PendingEvent::notify(
                entry.user_id,
                "It's your turn! Please proceed to the service point.",
                Some(entry.service_point_id),
                true,
            ),
            PendingEvent::live_position(entry.position, entry.service_point_id, entry.user_id),
        ];
        Ok(Committed { value: entry, events })
    }

    /// Mark a called visitor as served and compact the queue behind them
    pub fn dismiss(
        &self,
        identity: &Identity,
        entry_id: EntryId,
    ) -> QueueResult<Committed<Departure>> {
        identity.require(Capability::DismissOwn)?;
        let entry = self
            .store
            .entry(entry_id)?
            .ok_or_else(|| QueueError::NotFound("Queue entry not found.".to_string()))?;
        self.owned_point(identity, entry.service_point_id)?;

        let departure = self
            .store
            .depart(
                entry_id,
                EntryStatus::Served,
                &[EntryStatus::Called],
                self.clock.now(),
            )
            .map_err(Self::map_transition_error)?;

        log::info!(
            "{} served at {}",
            departure.entry.user_id,
            departure.entry.service_point_id
        );
        let mut events = vec![
            PendingEvent::notify(
                departure.entry.user_id,
                "Thank you for your visit!",
                Some(departure.entry.service_point_id),
                true,
            ),
            PendingEvent::live_deleted(departure.entry.service_point_id, departure.entry.user_id),
        ];
        Self::push_reposition_events(&mut events, &departure.repositioned);
        Ok(Committed {
            value: departure,
            events,
        })
    }

    /// Leave the queue voluntarily
    ///
    /// Without an explicit entry id the caller's single active entry is the
    /// target. An explicit id must name the caller's own active entry; any
    /// other id is reported as missing rather than forbidden, so entry ids
    /// cannot be probed.
    pub fn leave(
        &self,
        identity: &Identity,
        entry_id: Option<EntryId>,
    ) -> QueueResult<Committed<Departure>> {
        let not_in_queue = || QueueError::NotFound("You are not currently in a queue.".to_string());
        let entry = match entry_id {
            Some(id) => self
                .store
                .entry(id)?
                .filter(|entry| entry.user_id == identity.user_id && entry.is_active())
                .ok_or_else(not_in_queue)?,
            None => self
                .store
                .active_entry_for_user(identity.user_id)?
                .ok_or_else(not_in_queue)?,
        };

        let departure = self
            .store
            .depart(
                entry.id,
                EntryStatus::Abandoned,
                &[EntryStatus::Joined, EntryStatus::Called],
                self.clock.now(),
            )
            .map_err(Self::map_transition_error)?;

        log::info!(
            "{} left the queue at {}",
            departure.entry.user_id,
            departure.entry.service_point_id
        );
        let mut events = vec![
            PendingEvent::notify(
                departure.entry.user_id,
                "You have left the queue.",
                Some(departure.entry.service_point_id),
                false,
            ),
            PendingEvent::live_deleted(departure.entry.service_point_id, departure.entry.user_id),
        ];
        Self::push_reposition_events(&mut events, &departure.repositioned);
        Ok(Committed {
            value: departure,
            events,
        })
    }

    /// Close a service point: abandon its whole active set, then deactivate
    ///
    /// Closing an already-inactive point succeeds without effect, so a retry
    /// after a half-observed failure is safe.
    pub fn close_point(
        &self,
        identity: &Identity,
        point_id: ServicePointId,
    ) -> QueueResult<Committed<ServicePoint>> {
        identity.require(Capability::ManageOwnServicePoints)?;
        let point = self.owned_point(identity, point_id)?;
        if !point.active {
            return Ok(Committed::quiet(point));
        }

        let abandoned = self.store.abandon_all(point.id, self.clock.now())?;
        let mut events = Vec::with_capacity(abandoned.len() * 2);
        for entry in &abandoned {
            events.push(PendingEvent::notify(
                entry.user_id,
                format!("'{}' has closed; your queue entry was cancelled.", point.name),
                Some(point.id),
                false,
            ));
            events.push(PendingEvent::live_deleted(point.id, entry.user_id));
        }

        let point = self.registry.deactivate(point.id)?;
        log::info!(
            "Service point {} closed, {} entries abandoned",
            point.id,
            abandoned.len()
        );
        Ok(Committed {
            value: point,
            events,
        })
    }

    /// Hard-delete an inactive, empty service point
    pub fn purge_point(
        &self,
        identity: &Identity,
        point_id: ServicePointId,
    ) -> QueueResult<ServicePoint> {
        identity.require(Capability::ManageOwnServicePoints)?;
        self.owned_point(identity, point_id)?;
        self.registry.remove(point_id)
    }

    /// The caller's active entry, if they are queued anywhere
    pub fn my_position(&self, identity: &Identity) -> QueueResult<Option<QueueEntry>> {
        Ok(self.store.active_entry_for_user(identity.user_id)?)
    }

    /// Computed 1-based rank of an active entry within its queue
    pub fn rank(&self, entry_id: EntryId) -> QueueResult<Option<u32>> {
        Ok(self.store.rank(entry_id)?)
    }

    /// The active entries at a point in service order, for queue displays
    pub fn waiting_list(&self, point_id: ServicePointId) -> QueueResult<Vec<QueueEntry>> {
        self.registry
            .active_point(point_id)?
            .ok_or_else(|| QueueError::NotFound("Service point not found or inactive.".to_string()))?;
        Ok(self.store.active_entries(point_id)?)
    }

    /// Aggregate statistics over the caller's owned points
    pub fn analytics(&self, identity: &Identity) -> QueueResult<QueueAnalytics> {
        identity.require(Capability::ViewOwnAnalytics)?;
        let entries = self
            .store
            .entries_for_points(&identity.owned_points_sorted())?;
        Ok(analytics::summarize(&entries))
    }

    /// Resolve a point the caller must own; absent points are `NotFound`,
    /// someone else's points are `Forbidden`
    fn owned_point(
        &self,
        identity: &Identity,
        point_id: ServicePointId,
    ) -> QueueResult<ServicePoint> {
        let point = self
            .registry
            .point(point_id)?
            .ok_or_else(|| QueueError::NotFound("Service point not found.".to_string()))?;
        if point.owner != identity.user_id {
            return Err(QueueError::Forbidden(
                "You do not own this service point.".to_string(),
            ));
        }
        Ok(point)
    }

    fn push_reposition_events(events: &mut Vec<PendingEvent>, repositioned: &[QueueEntry]) {
        for entry in repositioned {
            events.push(PendingEvent::live_position(
                entry.position,
                entry.service_point_id,
                entry.user_id,
            ));
        }
    }

    fn map_transition_error(e: StoreError) -> QueueError {
        match e {
            StoreError::TransitionConflict {
                actual, expected, ..
            } => QueueError::Conflict(format!(
                "Entry is '{}'; this operation requires one of {:?}",
                actual,
                expected.iter().map(ToString::to_string).collect::<Vec<_>>()
            )),
            StoreError::EntryNotFound { .. } => {
                QueueError::NotFound("Queue entry not found.".to_string())
            }
            other => QueueError::Store(other),
        }
    }
}
