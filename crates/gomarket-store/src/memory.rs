//! In-process store backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{KeyValueStore, StoreError};

/// Volatile key-value store held in memory.
///
/// Useful for tests and for embedders that bring their own durability.
/// Reads and writes can be made to fail on demand to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: RwLock::new(entries),
            ..Self::default()
        }
    }

    /// Make every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of a raw entry, bypassing failure injection.
    pub async fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::ReadError {
                key: key.to_string(),
                reason: "injected read failure".to_string(),
            });
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteError {
                key: key.to_string(),
                reason: "injected write failure".to_string(),
            });
        }
        self.entries.write().await.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("k", b"first".to_vec()).await.unwrap();
        store.set("k", b"second".to_vec()).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().unwrap(), b"second");
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_with_entry() {
        let store = MemoryStore::with_entry("k", "v");
        assert_eq!(store.get("k").await.unwrap().unwrap(), b"v");
    }

    #[tokio::test]
    async fn test_injected_read_failure() {
        let store = MemoryStore::with_entry("k", "v");
        store.fail_reads(true);
        assert!(matches!(
            store.get("k").await,
            Err(StoreError::ReadError { .. })
        ));

        store.fail_reads(false);
        assert!(store.get("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_injected_write_failure_leaves_value() {
        let store = MemoryStore::with_entry("k", "old");
        store.fail_writes(true);

        assert!(store.set("k", b"new".to_vec()).await.is_err());
        assert_eq!(store.peek("k").await.unwrap(), b"old");
        assert_eq!(store.write_count(), 0);
    }
}
