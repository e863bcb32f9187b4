//! Persistence gateway.
//!
//! Structured values are kept as pretty-printed JSON documents in named
//! stores. A [`DocumentStore`] backend only moves bytes; [`load`] and [`save`]
//! own the JSON codec and the load-with-default contract:
//!
//! - absent store: the caller's default
//! - unreadable or unparseable store: the caller's default, plus a warning
//! - write failure: propagated as [`StorageError`]
//!
//! ## Backends
//!
//! - `FilesystemStore` - one file per store under a data directory
//! - `MemoryStore` - process-local, for tests and embedding

mod filesystem;
pub(crate) mod lenient;
mod memory;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{StorageConfig, StorageType};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on store {store}: {source}")]
    Io {
        store: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode store {store}: {source}")]
    Encode {
        store: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid store id: {0:?}")]
    InvalidId(String),

    #[error("Simulated failure on store {0}")]
    Injected(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Byte-level storage backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a whole store. `Ok(None)` when it does not exist yet.
    async fn read(&self, store_id: &str) -> Result<Option<Vec<u8>>>;

    /// Replace a whole store, creating it if needed.
    async fn write(&self, store_id: &str, contents: &[u8]) -> Result<()>;
}

/// Load a structured value, falling back to `default`.
///
/// Never fails: an absent store yields `default` silently, a store that
/// cannot be read or parsed yields `default` with a warning.
pub async fn load<T>(store: &dyn DocumentStore, store_id: &str, default: T) -> T
where
    T: DeserializeOwned,
{
    let bytes = match store.read(store_id).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!(store = %store_id, "Store absent, using default");
            return default;
        }
        Err(e) => {
            warn!(store = %store_id, error = %e, "Store unreadable, using default");
            return default;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                store = %store_id,
                error = %e,
                size = bytes.len(),
                "Store could not be decoded, using default"
            );
            default
        }
    }
}

/// Serialize `data` and replace the store's contents with it.
pub async fn save<T>(store: &dyn DocumentStore, store_id: &str, data: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec_pretty(data).map_err(|source| StorageError::Encode {
        store: store_id.to_string(),
        source,
    })?;
    store.write(store_id, &bytes).await?;
    debug!(store = %store_id, size = bytes.len(), "Saved store");
    Ok(())
}

/// Reject ids that would escape the backend's namespace.
pub(crate) fn validate_store_id(store_id: &str) -> Result<()> {
    let escapes = store_id.is_empty()
        || store_id.starts_with('/')
        || store_id.starts_with('\\')
        || store_id.split(['/', '\\']).any(|part| part == "..");
    if escapes {
        return Err(StorageError::InvalidId(store_id.to_string()));
    }
    Ok(())
}

/// Initialize the configured storage backend.
pub async fn init_storage(config: &StorageConfig) -> Result<Arc<dyn DocumentStore>> {
    info!(
        storage_type = %config.storage_type,
        data_dir = %config.data_dir,
        "Initializing storage"
    );

    match config.storage_type {
        StorageType::Filesystem => Ok(Arc::new(FilesystemStore::new(&config.data_dir).await?)),
        StorageType::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
