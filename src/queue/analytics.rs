//! Aggregate queue statistics for staff dashboards

use crate::store::{EntryStatus, QueueEntry};
use serde::Serialize;

/// Summary over the full entry history of a set of service points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueAnalytics {
    pub total_served: u32,
    pub total_abandoned: u32,
    pub currently_active: u32,
    /// Mean minutes between joining and being called, over served entries;
    /// `None` until at least one entry has completed that path
    pub average_served_wait_minutes: Option<f64>,
}

/// Fold an entry history into its aggregate statistics
pub fn summarize(entries: &[QueueEntry]) -> QueueAnalytics {
    let mut total_served = 0u32;
    let mut total_abandoned = 0u32;
    let mut currently_active = 0u32;
    let mut waited_minutes = 0f64;
    let mut waited_samples = 0u32;

    for entry in entries {
        match entry.status {
            EntryStatus::Served => {
                total_served += 1;
                if let Some(called_at) = entry.called_at {
                    waited_minutes +=
                        (called_at - entry.joined_at).num_seconds() as f64 / 60.0;
                    waited_samples += 1;
                }
            }
            EntryStatus::Abandoned => total_abandoned += 1,
            EntryStatus::Joined | EntryStatus::Called => currently_active += 1,
        }
    }

    QueueAnalytics {
        total_served,
        total_abandoned,
        currently_active,
        average_served_wait_minutes: (waited_samples > 0)
            .then(|| waited_minutes / f64::from(waited_samples)),
    }
}
