//! In-memory document storage.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{validate_store_id, DocumentStore, Result, StorageError};

/// Document store that keeps every store in memory.
///
/// Failure injection hooks let tests exercise the write-failure paths.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Vec<u8>>>,
    fail_on_read: RwLock<bool>,
    failing_writes: RwLock<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    /// Make every subsequent write to `store_id` fail.
    pub async fn fail_writes_to(&self, store_id: &str) {
        self.failing_writes
            .write()
            .await
            .insert(store_id.to_string());
    }

    pub async fn clear_write_failures(&self) {
        self.failing_writes.write().await.clear();
    }

    /// Store raw bytes, bypassing the JSON codec.
    pub async fn put_raw(&self, store_id: &str, contents: &[u8]) {
        self.documents
            .write()
            .await
            .insert(store_id.to_string(), contents.to_vec());
    }

    pub async fn get_raw(&self, store_id: &str) -> Option<Vec<u8>> {
        self.documents.read().await.get(store_id).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, store_id: &str) -> Result<Option<Vec<u8>>> {
        validate_store_id(store_id)?;
        if *self.fail_on_read.read().await {
            return Err(StorageError::Injected(store_id.to_string()));
        }
        Ok(self.documents.read().await.get(store_id).cloned())
    }

    async fn write(&self, store_id: &str, contents: &[u8]) -> Result<()> {
        validate_store_id(store_id)?;
        if self.failing_writes.read().await.contains(store_id) {
            return Err(StorageError::Injected(store_id.to_string()));
        }
        self.put_raw(store_id, contents).await;
        Ok(())
    }
}
