//! Notification records, live-update payloads and pending event descriptors

use crate::core::types::{NotificationId, ServicePointId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persistent in-app notification record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Channel name carrying live updates for one service point
pub fn channel_for(point: ServicePointId) -> String {
    format!("queue_{}", point.0)
}

/// Transient payload published to a service point's live channel
///
/// Not persisted: subscribers that are offline when an update is published
/// never see it. The in-app [`Notification`] record is the durable signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiveUpdate {
    /// A visitor's position changed (including the initial join)
    Position {
        position: u32,
        service_point_id: ServicePointId,
        user_id: UserId,
    },
    /// A visitor left the active set (served or abandoned)
    Deleted {
        deleted: bool,
        service_point_id: ServicePointId,
        user_id: UserId,
    },
}

impl LiveUpdate {
    pub fn channel(&self) -> String {
        match self {
            LiveUpdate::Position {
                service_point_id, ..
            }
            | LiveUpdate::Deleted {
                service_point_id, ..
            } => channel_for(*service_point_id),
        }
    }
}

/// Side effect recorded by a committed transition, awaiting dispatch
///
/// The state machine appends these while holding its locks; the dispatcher
/// consumes them afterwards, so a slow or failing channel can never stall a
/// transition.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingEvent {
    /// Persist an in-app record for the user, optionally requesting email
    Notify {
        user_id: UserId,
        message: String,
        service_point_id: Option<ServicePointId>,
        email: bool,
    },
    /// Publish a transient payload to the point's live channel
    Live(LiveUpdate),
}

impl PendingEvent {
    pub fn notify(
        user_id: UserId,
        message: impl Into<String>,
        service_point_id: Option<ServicePointId>,
        email: bool,
    ) -> Self {
        PendingEvent::Notify {
            user_id,
            message: message.into(),
            service_point_id,
            email,
        }
    }

    pub fn live_position(position: u32, service_point_id: ServicePointId, user_id: UserId) -> Self {
        PendingEvent::Live(LiveUpdate::Position {
            position,
            service_point_id,
            user_id,
        })
    }

    pub fn live_deleted(service_point_id: ServicePointId, user_id: UserId) -> Self {
        PendingEvent::Live(LiveUpdate::Deleted {
            deleted: true,
            service_point_id,
            user_id,
        })
    }
}
