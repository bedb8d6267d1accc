//! Lock helpers for the shared registries.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard when a previous holder panicked.
///
/// Registry mutations are single-step inserts and flag flips, so a poisoned
/// guard still holds consistent state.
pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
