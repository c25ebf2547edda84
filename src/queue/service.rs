//! Queue service facade
//!
//! Pairs the synchronous state machine with the asynchronous notification
//! dispatcher: each mutating method commits its transition first, then feeds
//! the pending events to the dispatcher. Live-update and email failures are
//! swallowed inside the dispatcher; only a failure to persist the mandatory
//! in-app record surfaces from here.

use crate::auth::Identity;
use crate::core::types::{EntryId, NotificationId, ServicePointId};
use crate::notifications::{Notification, NotificationDispatcher, NotificationError, PendingEvent};
use crate::queue::analytics::QueueAnalytics;
use crate::queue::engine::QueueEngine;
use crate::queue::error::{QueueError, QueueResult};
use crate::registry::ServicePoint;
use crate::store::{Departure, QueueEntry};
use std::sync::Arc;

pub struct QueueService {
    engine: QueueEngine,
    dispatcher: Arc<NotificationDispatcher>,
}

impl QueueService {
    pub fn new(engine: QueueEngine, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { engine, dispatcher }
    }

    pub fn engine(&self) -> &QueueEngine {
        &self.engine
    }

    pub async fn join(
        &self,
        identity: &Identity,
        point: ServicePointId,
        priority_level: Option<u8>,
    ) -> QueueResult<QueueEntry> {
        let committed = self.engine.join(identity, point, priority_level)?;
        self.dispatch(committed.events).await?;
        Ok(committed.value)
    }

    pub async fn call_next(
        &self,
        identity: &Identity,
        point: Option<ServicePointId>,
    ) -> QueueResult<QueueEntry> {
        let committed = self.engine.call_next(identity, point)?;
        self.dispatch(committed.events).await?;
        Ok(committed.value)
    }

    pub async fn dismiss(&self, identity: &Identity, entry: EntryId) -> QueueResult<Departure> {
        let committed = self.engine.dismiss(identity, entry)?;
        self.dispatch(committed.events).await?;
        Ok(committed.value)
    }

    pub async fn leave(
        &self,
        identity: &Identity,
        entry: Option<EntryId>,
    ) -> QueueResult<Departure> {
        let committed = self.engine.leave(identity, entry)?;
        self.dispatch(committed.events).await?;
        Ok(committed.value)
    }

    pub async fn close_point(
        &self,
        identity: &Identity,
        point: ServicePointId,
    ) -> QueueResult<ServicePoint> {
        let committed = self.engine.close_point(identity, point)?;
        self.dispatch(committed.events).await?;
        Ok(committed.value)
    }

    pub fn purge_point(
        &self,
        identity: &Identity,
        point: ServicePointId,
    ) -> QueueResult<ServicePoint> {
        self.engine.purge_point(identity, point)
    }

    pub fn my_position(&self, identity: &Identity) -> QueueResult<Option<QueueEntry>> {
        self.engine.my_position(identity)
    }

    pub fn rank(&self, entry: EntryId) -> QueueResult<Option<u32>> {
        self.engine.rank(entry)
    }

    pub fn waiting_list(&self, point: ServicePointId) -> QueueResult<Vec<QueueEntry>> {
        self.engine.waiting_list(point)
    }

    pub fn analytics(&self, identity: &Identity) -> QueueResult<QueueAnalytics> {
        self.engine.analytics(identity)
    }

    /// The caller's in-app notifications, newest first
    pub fn notifications_for(&self, identity: &Identity) -> QueueResult<Vec<Notification>> {
        Ok(self.dispatcher.inbox().list_for(identity.user_id)?)
    }

    pub fn mark_notification_read(
        &self,
        identity: &Identity,
        id: NotificationId,
    ) -> QueueResult<Notification> {
        self.dispatcher
            .inbox()
            .mark_read(identity.user_id, id)
            .map_err(Self::map_inbox_error)
    }

    pub fn delete_notification(
        &self,
        identity: &Identity,
        id: NotificationId,
    ) -> QueueResult<()> {
        self.dispatcher
            .inbox()
            .delete(identity.user_id, id)
            .map_err(Self::map_inbox_error)
    }

    async fn dispatch(&self, events: Vec<PendingEvent>) -> QueueResult<()> {
        Ok(self.dispatcher.dispatch(events).await?)
    }

    fn map_inbox_error(e: NotificationError) -> QueueError {
        match e {
            NotificationError::RecordNotFound { .. } => {
                QueueError::NotFound("Notification not found.".to_string())
            }
            other => QueueError::Notification(other),
        }
    }
}
