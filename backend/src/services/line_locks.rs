//! Per-line write serialization.
//!
//! Every read-modify-write of a line's segments (load, mutate the chain,
//! persist the diff) runs while holding that line's lock, so two concurrent
//! requests on the same line never compute diffs against the same snapshot.
//! Different lines proceed in parallel.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::LineId;

/// In-memory registry of per-line async mutexes.
#[derive(Clone, Default)]
pub struct LineLocks {
    locks: Arc<RwLock<HashMap<LineId, Arc<Mutex<()>>>>>,
}

impl LineLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `line_id`.
    ///
    /// The returned guard releases the line when dropped.
    pub async fn lock(&self, line_id: LineId) -> OwnedMutexGuard<()> {
        let mutex = self.mutex_for(line_id);
        mutex.lock_owned().await
    }

    /// Drop the mutex for a deleted line.
    ///
    /// A task still holding or awaiting the old mutex keeps its own `Arc`, so
    /// this never invalidates a live guard.
    pub fn forget(&self, line_id: LineId) {
        self.locks.write().remove(&line_id);
    }

    /// Number of lines with a registered mutex.
    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }

    fn mutex_for(&self, line_id: LineId) -> Arc<Mutex<()>> {
        if let Some(mutex) = self.locks.read().get(&line_id) {
            return Arc::clone(mutex);
        }

        let mut locks = self.locks.write();
        Arc::clone(locks.entry(line_id).or_default())
    }
}
