//! Error classification shared by the queue, store and notification errors
//!
//! Operations fail in two distinct ways: the caller did something the rules
//! forbid (joined twice, priority out of range, acting on someone else's
//! point), or the system itself broke (poisoned lock, failed record persist).
//! The first kind carries a message worth showing verbatim; the second must
//! stay generic at the surface with detail reserved for debug logs.

/// Splits an error type into user-actionable and system failures
///
/// When `is_user_actionable()` is true, `user_message()` must return the
/// message to surface; when false it must return `None`.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Log a failed operation at the right level of detail
///
/// User-actionable errors log their own message; system errors log only the
/// operation context, with the full error pushed down to debug level.
pub fn log_error_with_context<E: ContextualError>(error: &E, operation_context: &str) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FAILED: {}", user_msg),
        _ => log::error!("FAILED: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    enum FakeError {
        AlreadyQueued,
        LockPoisoned,
    }

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                FakeError::AlreadyQueued => write!(f, "You are already in a queue."),
                FakeError::LockPoisoned => write!(f, "lock poisoned: thread 14 panicked"),
            }
        }
    }

    impl std::error::Error for FakeError {}

    impl ContextualError for FakeError {
        fn is_user_actionable(&self) -> bool {
            matches!(self, FakeError::AlreadyQueued)
        }

        fn user_message(&self) -> Option<&str> {
            match self {
                FakeError::AlreadyQueued => Some("You are already in a queue."),
                FakeError::LockPoisoned => None,
            }
        }
    }

    #[test]
    fn test_rule_violations_carry_their_message() {
        let error = FakeError::AlreadyQueued;
        assert!(error.is_user_actionable());
        assert_eq!(error.user_message(), Some("You are already in a queue."));
    }

    #[test]
    fn test_system_failures_stay_generic() {
        let error = FakeError::LockPoisoned;
        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);
        // Logging must not panic on either kind
        log_error_with_context(&error, "joining the queue");
        log_error_with_context(&FakeError::AlreadyQueued, "joining the queue");
    }
}
