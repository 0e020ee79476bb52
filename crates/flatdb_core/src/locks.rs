//! Per-collection lock registry.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Hands out one mutual-exclusion lock per collection name.
///
/// Every operation against a collection locks that collection's single
/// lock instance for the duration of its filesystem work, which serializes
/// writes, reads, listings and deletes on one collection while leaving
/// different collections fully independent.
///
/// The registry's own map is a shared, mutated structure; its get-or-insert
/// step is guarded by a registry-wide mutex held only for that lookup,
/// never for the caller's whole operation.
#[derive(Debug, Default)]
pub(crate) struct LockRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the single lock instance for `collection`, creating it on
    /// first use. Callers lock the returned handle; dropping the guard
    /// releases the collection.
    pub fn collection_lock(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(
            locks
                .entry(collection.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn same_collection_returns_same_lock() {
        let registry = LockRegistry::new();

        let a = registry.collection_lock("users");
        let b = registry.collection_lock("users");

        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_collections_get_distinct_locks() {
        let registry = LockRegistry::new();

        let users = registry.collection_lock("users");
        let posts = registry.collection_lock("posts");

        assert!(!Arc::ptr_eq(&users, &posts));
    }

    #[test]
    fn held_lock_blocks_same_collection_only() {
        let registry = LockRegistry::new();

        let users = registry.collection_lock("users");
        let _guard = users.lock();

        // Same collection: a second caller cannot acquire while held.
        let users_again = registry.collection_lock("users");
        assert!(users_again.try_lock().is_none());

        // Different collection: unaffected.
        let posts = registry.collection_lock("posts");
        assert!(posts.try_lock().is_some());
    }

    #[test]
    fn concurrent_lookups_converge_on_one_lock() {
        let registry = Arc::new(LockRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.collection_lock("users"))
            })
            .collect();

        let locks: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for lock in &locks[1..] {
            assert!(Arc::ptr_eq(&locks[0], lock));
        }
    }

    #[test]
    fn lock_serializes_critical_sections() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let registry = Arc::new(LockRegistry::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let rounds = 50;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..rounds {
                        let lock = registry.collection_lock("users");
                        let _guard = lock.lock();
                        // Non-atomic read-modify-write: only safe because the
                        // collection lock serializes this section.
                        let seen = counter.load(Ordering::Relaxed);
                        thread::yield_now();
                        counter.store(seen + 1, Ordering::Relaxed);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.load(Ordering::Relaxed), 4 * rounds);
    }
}
