//! Storage configuration types.

use serde::Deserialize;

/// Storage backend discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// JSON files under `data_dir`.
    #[default]
    Filesystem,
    /// Process-local memory. Nothing survives a restart.
    Memory,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Filesystem => write!(f, "filesystem"),
            StorageType::Memory => write!(f, "memory"),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend.
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// Directory holding the JSON stores (filesystem backend only).
    pub data_dir: String,
    /// Store id of the movie catalog.
    pub catalog_file: String,
    /// Store id of the sales ledger.
    pub ledger_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Filesystem,
            data_dir: "dados".to_string(),
            catalog_file: "filmes.json".to_string(),
            ledger_file: "historico.json".to_string(),
        }
    }
}
