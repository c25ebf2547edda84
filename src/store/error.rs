//! Entry store error types

use crate::core::types::{EntryId, ServicePointId, UserId};
use crate::store::entry::EntryStatus;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("User {user} already holds an active queue entry")]
    DuplicateActiveEntry { user: UserId },

    #[error("Queue entry not found: {entry}")]
    EntryNotFound { entry: EntryId },

    #[error("Queue entry {entry} is '{actual}', expected one of {expected:?}")]
    TransitionConflict {
        entry: EntryId,
        actual: EntryStatus,
        expected: Vec<EntryStatus>,
    },

    #[error("Queue at {point} is full (max length: {limit})")]
    CapacityExceeded { point: ServicePointId, limit: u32 },

    #[error("{0}")]
    LockPoisoned(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
