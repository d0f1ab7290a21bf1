//! Configuration loading and representation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};

use crate::storage::{FileStorage, InMemoryStorage, KeyValueStorage};

/// Key prefix the storefront has always used.
pub const DEFAULT_NAMESPACE: &str = "retailer-shop";

const DEFAULT_DATA_DIR: &str = "./shopfront-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Prefix for the three slot keys.
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl StorageConfig {
    /// Read `SHOPFRONT_STORAGE`, `SHOPFRONT_DATA_DIR` and `SHOPFRONT_NAMESPACE`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let namespace = lookup("SHOPFRONT_NAMESPACE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let backend = match lookup("SHOPFRONT_STORAGE").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StorageBackend::Memory,
            Some("file") => {
                let dir = lookup("SHOPFRONT_DATA_DIR").unwrap_or_else(|| {
                    tracing::warn!("SHOPFRONT_DATA_DIR not set; using {}", DEFAULT_DATA_DIR);
                    DEFAULT_DATA_DIR.to_string()
                });
                StorageBackend::File { dir: dir.into() }
            }
            Some(other) => bail!("unknown SHOPFRONT_STORAGE backend '{other}' (expected memory or file)"),
        };

        Ok(Self { backend, namespace })
    }

    pub fn items_key(&self) -> String {
        format!("{}-items", self.namespace)
    }

    pub fn basket_key(&self) -> String {
        format!("{}-basket", self.namespace)
    }

    pub fn orders_key(&self) -> String {
        format!("{}-orders", self.namespace)
    }
}

/// Instantiate the configured backend, creating the data directory if needed.
pub fn open_storage(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStorage>> {
    match &config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryStorage::new())),
        StorageBackend::File { dir } => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create data directory at {dir:?}"))?;
            tracing::info!(dir = %dir.display(), "using file storage");
            Ok(Arc::new(FileStorage::new(dir.clone())))
        }
    }
}
