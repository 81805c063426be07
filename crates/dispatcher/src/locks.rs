//! Per-user write serialization.
//!
//! Two concurrent messages from the same user must not interleave
//! their store writes: the slot allocator computes next-free-slot and
//! inserts in two steps, so unserialized adds could collide on a slot.
//! Each user gets one async mutex; different users never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of per-user locks, created on first use.
#[derive(Debug, Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    /// Create an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `user_id`, waiting if a dispatch for the
    /// same user is in flight.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
