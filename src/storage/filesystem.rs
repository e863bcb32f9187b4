//! Filesystem-based document storage.
//!
//! Each store is one file under the base directory:
//! ```text
//! {base_path}/
//!   filmes.json
//!   historico.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{validate_store_id, DocumentStore, Result, StorageError};

/// Filesystem-based document store.
pub struct FilesystemStore {
    base_path: PathBuf,
}

impl FilesystemStore {
    /// Create a new filesystem store.
    ///
    /// Creates the base directory if it doesn't exist.
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)
            .await
            .map_err(|source| StorageError::Io {
                store: base_path.display().to_string(),
                source,
            })?;
        Ok(Self { base_path })
    }

    /// Get the file path for a store id.
    pub fn path_for(&self, store_id: &str) -> Result<PathBuf> {
        validate_store_id(store_id)?;
        Ok(self.base_path.join(store_id))
    }
}

fn io_error(store_id: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        store: store_id.to_string(),
        source,
    }
}

#[async_trait]
impl DocumentStore for FilesystemStore {
    async fn read(&self, store_id: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(store_id)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), size = bytes.len(), "Read store");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(store_id)(e)),
        }
    }

    async fn write(&self, store_id: &str, contents: &[u8]) -> Result<()> {
        let path = self.path_for(store_id)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(io_error(store_id))?;
        }

        // Write atomically using temp file + rename
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        fs::write(&temp_path, contents)
            .await
            .map_err(io_error(store_id))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(io_error(store_id))?;

        debug!(path = %path.display(), size = contents.len(), "Wrote store");
        Ok(())
    }
}
