//! Queue operation error taxonomy

use crate::notifications::NotificationError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Referenced service point / queue entry / notification absent or not
    /// owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// Role or ownership check failed
    #[error("{0}")]
    Forbidden(String),

    /// Duplicate active join, or entry not in the required source state for
    /// the requested transition
    #[error("{0}")]
    Conflict(String),

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// Store-level failure surfaced to the caller; the transport decides
    /// retry policy, the state machine never retries internally
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    /// The mandatory in-app notification record could not be persisted after
    /// an otherwise committed transition
    #[error("Notification delivery failed: {0}")]
    Notification(#[from] NotificationError),
}

impl crate::core::error_handling::ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            QueueError::NotFound(_)
                | QueueError::Forbidden(_)
                | QueueError::Conflict(_)
                | QueueError::Validation(_)
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::NotFound(msg)
            | QueueError::Forbidden(msg)
            | QueueError::Conflict(msg)
            | QueueError::Validation(msg) => Some(msg),
            QueueError::Store(_) | QueueError::Notification(_) => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
