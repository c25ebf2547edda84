//! Lock-poison handling shared by the store, registry and inbox
//!
//! A poisoned lock means a thread panicked while holding it; the queue state
//! behind that lock may be mid-transition. Rather than panicking in turn,
//! every subsystem converts the poison into its own error variant through
//! these helpers and lets the caller decide.

use std::sync::{LockResult, RwLockReadGuard, RwLockWriteGuard};

fn poison_message(kind: &str, detail: &dyn std::fmt::Debug) -> String {
    format!(
        "Internal synchronisation error ({kind} poisoned): a panic occurred while the lock was held. {detail:?}"
    )
}

/// Convert a poisoned mutex acquisition into a domain error
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use queueflow::core::sync::handle_mutex_poison;
/// use queueflow::store::StoreError;
///
/// let scope = Mutex::new(());
/// let guard = handle_mutex_poison(scope.lock(), StoreError::LockPoisoned).unwrap();
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|e| error_constructor(poison_message("mutex", &e)))
}

/// Convert a poisoned RwLock read acquisition into a domain error
pub fn handle_rwlock_read<T, E>(
    result: LockResult<RwLockReadGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockReadGuard<T>, E> {
    result.map_err(|e| error_constructor(poison_message("RwLock read", &e)))
}

/// Convert a poisoned RwLock write acquisition into a domain error
pub fn handle_rwlock_write<T, E>(
    result: LockResult<RwLockWriteGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockWriteGuard<T>, E> {
    result.map_err(|e| error_constructor(poison_message("RwLock write", &e)))
}
