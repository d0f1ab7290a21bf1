use std::sync::Arc;

use thiserror::Error;

/// Failure of the storage backend itself (not of the data it holds).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// String key/value storage holding one JSON document per key.
///
/// This is the seam between the storefront and wherever its state lives; services take
/// it as an injected dependency so tests can run against [`InMemoryStorage`].
///
/// [`InMemoryStorage`]: crate::storage::InMemoryStorage
pub trait KeyValueStorage: Send + Sync {
    /// Raw value at `key`, `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value at `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; absent keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S> KeyValueStorage for Arc<S>
where
    S: KeyValueStorage + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
