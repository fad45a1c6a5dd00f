//! Per-character write locks.
//!
//! Writes to one character's attribute triple (base, equipment links,
//! overlay) are serialized through an async mutex keyed by character id.
//! Different characters never share a mutex. Entries are pruned once no
//! holder or waiter references them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::core::error::{Result, SheetError};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Registry of per-character mutexes. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct CharacterLocks {
    inner: Arc<Mutex<LockMap>>,
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait up to `timeout` for exclusive access to `character_id`.
    pub async fn acquire(&self, character_id: &str, timeout: Duration) -> Result<CharacterGuard> {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(character_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        match tokio::time::timeout(timeout, mutex.lock_owned()).await {
            Ok(guard) => Ok(CharacterGuard {
                character_id: character_id.to_string(),
                guard: Some(guard),
                registry: self.inner.clone(),
            }),
            Err(_) => {
                // Our clone is dropped by now; let a sole map entry go
                self.prune(character_id);
                Err(SheetError::conflict(
                    character_id,
                    format!("timed out after {}ms waiting for character lock", timeout.as_millis()),
                ))
            }
        }
    }

    /// Number of characters with a live lock entry.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&self, character_id: &str) {
        prune_entry(&self.inner, character_id);
    }
}

fn prune_entry(registry: &Mutex<LockMap>, character_id: &str) {
    let mut map = registry.lock().unwrap_or_else(|e| e.into_inner());
    if map
        .get(character_id)
        .is_some_and(|entry| Arc::strong_count(entry) == 1)
    {
        map.remove(character_id);
    }
}

/// Exclusive access to one character until dropped.
pub struct CharacterGuard {
    character_id: String,
    guard: Option<OwnedMutexGuard<()>>,
    registry: Arc<Mutex<LockMap>>,
}

impl CharacterGuard {
    pub fn character_id(&self) -> &str {
        &self.character_id
    }
}

impl Drop for CharacterGuard {
    fn drop(&mut self) {
        // Release before pruning so the guard's own reference is gone
        drop(self.guard.take());
        prune_entry(&self.registry, &self.character_id);
    }
}
