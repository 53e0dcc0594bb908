//! Synchronization utilities for robust lock handling
//!
//! Converts lock poisoning into domain errors in a consistent manner across
//! the codebase.

use std::sync::{LockResult, RwLockReadGuard, RwLockWriteGuard};

/// Handle poisoned mutex (or condition wait) results with consistent error handling
///
/// Converts a poison error into an application-specific error using the
/// provided constructor. Also accepts the result of `Condvar::wait_while`,
/// which reports poisoning the same way.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use consumer_pool::core::sync::handle_mutex_poison;
/// use consumer_pool::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| QueueError::Poisoned { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

/// Handle poisoned RwLock read operations with consistent error handling
pub fn handle_rwlock_read<T, E>(
    result: LockResult<RwLockReadGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockReadGuard<T>, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (RwLock read poisoned). This indicates a panic occurred while holding a write lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

/// Handle poisoned RwLock write operations with consistent error handling
pub fn handle_rwlock_write<T, E>(
    result: LockResult<RwLockWriteGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockWriteGuard<T>, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (RwLock write poisoned). This indicates a panic occurred while holding the lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
