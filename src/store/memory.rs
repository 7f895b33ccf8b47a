//! In-memory profile store.
//!
//! Collections keep insertion order so snapshots arrive the way the hosted
//! store's live listener would deliver them. Read/write failure can be
//! toggled to exercise the degradation paths (role lookup failure, the
//! identity-without-record signup gap).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::watch;

use super::{CollectionSnapshot, ProfileStore};
use crate::error::{Error, Result};

#[derive(Default)]
struct Collection {
    /// (child key, record) in insertion order
    records: Vec<(String, Value)>,
    watchers: Option<watch::Sender<CollectionSnapshot>>,
}

impl Collection {
    fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            records: self.records.clone(),
        }
    }

    fn notify(&self) {
        if let Some(tx) = &self.watchers {
            tx.send_replace(self.snapshot());
        }
    }
}

/// In-memory [`ProfileStore`] implementation
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every read fail with a storage error
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail with a storage error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn split_path(path: &str) -> Option<(&str, &str)> {
        path.split_once('/')
            .filter(|(c, k)| !c.is_empty() && !k.is_empty())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::StorageRead("store unreachable".into()));
        }

        let (collection, key) = Self::split_path(path)
            .ok_or_else(|| Error::StorageRead(format!("malformed path: {}", path)))?;
        let collections = self.collections.read();
        Ok(collections.get(collection).and_then(|c| {
            c.records
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }))
    }

    async fn write(&self, path: &str, record: Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::StorageWrite("store unreachable".into()));
        }

        let (collection, key) = Self::split_path(path)
            .ok_or_else(|| Error::StorageWrite(format!("malformed path: {}", path)))?;
        let mut collections = self.collections.write();
        let entry = collections.entry(collection.to_string()).or_default();

        // Whole-record replace; a rewritten key keeps its position.
        match entry.records.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = record,
            None => entry.records.push((key.to_string(), record)),
        }
        entry.notify();

        tracing::debug!("Wrote record at {}", path);
        Ok(())
    }

    fn subscribe(&self, collection: &str) -> watch::Receiver<CollectionSnapshot> {
        let mut collections = self.collections.write();
        let entry = collections.entry(collection.to_string()).or_default();
        match &entry.watchers {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = watch::channel(entry.snapshot());
                entry.watchers = Some(tx);
                rx
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
