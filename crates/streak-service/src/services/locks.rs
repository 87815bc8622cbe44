//! Per-key mutual exclusion for read-modify-write sequences on one user record

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of async mutexes keyed by username.
///
/// An entry lives only while some task holds or waits for its lock.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    table: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: &str) -> KeyGuard<'_> {
        let lock = self
            .table
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = Arc::clone(&lock).lock_owned().await;

        KeyGuard {
            table: &self.table,
            key: key.to_owned(),
            lock,
            guard: Some(guard),
        }
    }

    /// Number of keys currently locked or awaited
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Exclusive access to one key, released on drop
#[derive(Debug)]
pub struct KeyGuard<'a> {
    table: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // The table and this guard hold the only references when nobody waits.
        self.table
            .remove_if(&self.key, |_, lock| Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2);
    }
}
