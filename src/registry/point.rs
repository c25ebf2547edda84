//! Service point record

use crate::core::types::{ServicePointId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capacity and feature configuration for one service point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointConfig {
    /// Hard limit on the active queue length; `None` means unlimited
    pub max_queue_length: Option<u32>,
    /// Whether visitors may join with a priority level
    pub supports_priority: bool,
    /// Whether the point accepts appointment-based entries
    pub supports_appointments: bool,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            max_queue_length: None,
            supports_priority: false,
            supports_appointments: false,
        }
    }
}

/// A physical or virtual counter with its own independent queue
///
/// The record persists for history after deactivation; it is only removed by
/// an explicit administrative purge of an inactive point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePoint {
    pub id: ServicePointId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub active: bool,
    /// The staff member who created the point and may act on its queue
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub config: PointConfig,
}
