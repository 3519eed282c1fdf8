//! Per-key mutual exclusion for read-modify-write cycles.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Lock table keyed by storage key.
///
/// Every mutation of a record store loads the whole file, edits it in
/// memory and writes it back; holding the key's lock across that cycle
/// keeps concurrent writers to one key from losing updates. Locks are never
/// evicted; the key space is bounded by the number of registries and
/// collections.
#[derive(Default)]
pub struct LockTable {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `key`, created on first use.
    pub fn get(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(key.to_string()).or_default().clone()
    }
}
