//! Entity identity and lifecycle bookkeeping
//!
//! Ids come from a monotonic counter and are never reused; the live count is
//! an independent statistic that tracks currently-constructed entities.
//! Entities hold an [`IdentityTag`] whose `Drop` releases the id, so the
//! count follows explicit ownership boundaries rather than collector timing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique identifier of a domain entity.
///
/// Strictly increasing for the lifetime of the process; a released id is
/// never handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates entity ids and tracks how many entities are currently alive.
#[derive(Debug)]
pub struct IdentityRegistry {
    next: AtomicU64,
    live: AtomicU64,
}

impl IdentityRegistry {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
            live: AtomicU64::new(0),
        }
    }

    /// The process-wide registry backing entity construction.
    pub fn global() -> &'static IdentityRegistry {
        static GLOBAL: IdentityRegistry = IdentityRegistry::new();
        &GLOBAL
    }

    /// Hand out the next id and count the entity as live.
    pub fn allocate(&self) -> EntityId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.live.fetch_add(1, Ordering::Relaxed);
        EntityId(id)
    }

    /// Mark an entity as gone. The id stays retired; only the live count
    /// moves, and it saturates at zero.
    pub fn release(&self, id: EntityId) {
        let _ = self
            .live
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |live| {
                live.checked_sub(1)
            });
        tracing::trace!(id = %id, "entity released");
    }

    /// Number of currently live entities.
    pub fn live_count(&self) -> u64 {
        self.live.load(Ordering::Relaxed)
    }
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle on an allocated id; dropping it releases the entity from the
/// global live count.
#[derive(Debug)]
pub(crate) struct IdentityTag(EntityId);

impl IdentityTag {
    pub(crate) fn allocate() -> Self {
        Self(IdentityRegistry::global().allocate())
    }

    pub(crate) fn id(&self) -> EntityId {
        self.0
    }
}

impl Drop for IdentityTag {
    fn drop(&mut self) {
        IdentityRegistry::global().release(self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_strictly_increasing() {
        let registry = IdentityRegistry::new();
        let a = registry.allocate();
        let b = registry.allocate();
        let c = registry.allocate();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_live_count_tracks_allocate_and_release() {
        let registry = IdentityRegistry::new();
        let a = registry.allocate();
        let b = registry.allocate();
        assert_eq!(registry.live_count(), 2);
        registry.release(a);
        assert_eq!(registry.live_count(), 1);
        registry.release(b);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_released_ids_are_not_reused() {
        let registry = IdentityRegistry::new();
        let a = registry.allocate();
        registry.release(a);
        let b = registry.allocate();
        assert!(b > a);
    }

    #[test]
    fn test_release_saturates_at_zero() {
        let registry = IdentityRegistry::new();
        let a = registry.allocate();
        registry.release(a);
        registry.release(a);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_global_ids_are_unique() {
        let a = IdentityRegistry::global().allocate();
        let b = IdentityRegistry::global().allocate();
        assert!(b > a);
        IdentityRegistry::global().release(a);
        IdentityRegistry::global().release(b);
    }
}
