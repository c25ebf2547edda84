//! Queue entry model

use crate::core::types::{EntryId, ServicePointId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Status of a queue entry
///
/// `joined -> called -> served`, or `joined`/`called` -> `abandoned` (leave or
/// service point closure). `served` and `abandoned` are terminal; no
/// transition leaves them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryStatus {
    Joined,
    Called,
    Served,
    Abandoned,
}

impl EntryStatus {
    /// Whether an entry in this status occupies a position in its queue
    pub fn is_active(&self) -> bool {
        matches!(self, EntryStatus::Joined | EntryStatus::Called)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

/// One user's place in one service point's queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub service_point_id: ServicePointId,
    pub user_id: UserId,
    /// 1-based, dense and unique within the point's active set
    pub position: u32,
    pub status: EntryStatus,
    pub joined_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub served_at: Option<DateTime<Utc>>,
    /// 1..=4; only set when the service point supports priority
    pub priority_level: Option<u8>,
    pub estimated_wait_minutes: Option<i64>,
}

impl QueueEntry {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Sort key ordering the active set: priority descending, position
    /// ascending, earliest join as the final tie-break
    ///
    /// Entries without a priority level sort as the lowest level, so the key
    /// is total across priority and non-priority service points.
    pub fn rank_key(&self) -> (i16, u32, DateTime<Utc>) {
        let priority = i16::from(self.priority_level.unwrap_or(1));
        (-priority, self.position, self.joined_at)
    }
}
