//! Per-key serialization of mutations.
//!
//! Mutations on the same agent run one after another in arrival order;
//! mutations on different agents never wait on each other. Each key owns a
//! fair `tokio::sync::Mutex`, and the slot is reclaimed once nobody holds or
//! waits on it.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slots = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

#[derive(Debug, Default)]
pub struct KeyedMutationQueue {
    slots: Slots,
}

/// Exclusive turn for one key. Dropping it lets the next waiter in.
#[derive(Debug)]
pub struct KeyGuard {
    key: String,
    turn: Option<OwnedMutexGuard<()>>,
    slots: Slots,
}

impl KeyedMutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for every earlier holder of `key` to finish, then take the turn.
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let slot = {
            let mut slots = self.slots.lock();
            prune_idle(&mut slots);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };
        let turn = slot.lock_owned().await;
        KeyGuard {
            key: key.to_string(),
            turn: Some(turn),
            slots: Arc::clone(&self.slots),
        }
    }

    /// Number of keys currently held or waited on.
    pub fn active_keys(&self) -> usize {
        let mut slots = self.slots.lock();
        prune_idle(&mut slots);
        slots.len()
    }
}

/// Drop slots referenced only by the map. A waiter cancelled after the
/// last holder left has nobody to reclaim its slot on drop.
fn prune_idle(slots: &mut HashMap<String, Arc<AsyncMutex<()>>>) {
    slots.retain(|_, slot| Arc::strong_count(slot) > 1);
}

impl KeyGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        let Some(turn) = self.turn.take() else {
            return;
        };
        let slot = Arc::clone(OwnedMutexGuard::mutex(&turn));
        drop(turn);
        // Only the map and `slot` left: no holder, no waiter.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(&self.key);
        }
    }
}
