//! Per-user async locks serialising service status read-modify-write cycles.
//!
//! Locks are sharded by [`UserId`], so unrelated recipients never contend.
//! When several users must be held together, [`RecipientLocks::lock_all`]
//! acquires them in ascending id order, which rules out lock-order
//! deadlocks between staleness refreshes and concurrent claims.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::UserId;

const PRUNE_THRESHOLD: usize = 1024;

/// Held lock on one user. Released on drop.
#[derive(Debug)]
pub struct UserLockGuard {
    _guard: OwnedMutexGuard<()>,
}

/// Held locks on several users. Released on drop.
#[derive(Debug)]
pub struct UserLockSet {
    _guards: Vec<OwnedMutexGuard<()>>,
}

/// Registry of per-user async mutexes shared by every assistance service.
///
/// Slots are created on first use and pruned once the registry grows past a
/// fixed size and nobody holds them.
#[derive(Debug, Default)]
pub struct RecipientLocks {
    slots: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl RecipientLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &UserId) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.len() >= PRUNE_THRESHOLD {
            // Only this map holds unused slots.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        }
        Arc::clone(slots.entry(id.clone()).or_default())
    }

    /// Wait for exclusive access to `id`.
    pub async fn lock(&self, id: &UserId) -> UserLockGuard {
        let slot = self.slot(id);
        UserLockGuard {
            _guard: slot.lock_owned().await,
        }
    }

    /// Lock every id in ascending order, ignoring duplicates.
    pub async fn lock_all<'a>(&self, ids: impl IntoIterator<Item = &'a UserId>) -> UserLockSet {
        let mut ordered: Vec<&UserId> = ids.into_iter().collect();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for id in ordered {
            guards.push(self.slot(id).lock_owned().await);
        }
        UserLockSet { _guards: guards }
    }

    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn same_user_is_exclusive() {
        let locks = Arc::new(RecipientLocks::new());
        let id = UserId::random();
        let guard = locks.lock(&id).await;

        let contender = {
            let locks = Arc::clone(&locks);
            let id = id.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(&id).await;
            })
        };
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender acquires after release")
            .expect("task completes");
    }

    #[tokio::test]
    async fn different_users_do_not_contend() {
        let locks = RecipientLocks::new();
        let _first = locks.lock(&UserId::random()).await;
        timeout(Duration::from_millis(100), locks.lock(&UserId::random()))
            .await
            .expect("independent lock is free");
    }

    #[tokio::test]
    async fn lock_all_tolerates_duplicates_and_any_order() {
        let locks = Arc::new(RecipientLocks::new());
        let a = UserId::random();
        let b = UserId::random();

        let forward = {
            let locks = Arc::clone(&locks);
            let (a, b) = (a.clone(), b.clone());
            tokio::spawn(async move {
                for _ in 0..50 {
                    let _set = locks.lock_all([&a, &b, &a]).await;
                    tokio::task::yield_now().await;
                }
            })
        };
        let backward = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                for _ in 0..50 {
                    let _set = locks.lock_all([&b, &a]).await;
                    tokio::task::yield_now().await;
                }
            })
        };

        timeout(Duration::from_secs(5), async {
            forward.await.expect("forward task");
            backward.await.expect("backward task");
        })
        .await
        .expect("no deadlock");
    }

    #[tokio::test]
    async fn unused_slots_are_pruned() {
        let locks = RecipientLocks::new();
        for _ in 0..(PRUNE_THRESHOLD + 10) {
            let _guard = locks.lock(&UserId::random()).await;
        }
        assert!(locks.slot_count() <= PRUNE_THRESHOLD);
    }
}
