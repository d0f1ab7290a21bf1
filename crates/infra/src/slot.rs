//! Typed JSON documents stored under a single key.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::storage::{KeyValueStorage, StorageError};

#[derive(Debug, Error)]
pub enum SlotError {
    /// The stored document exists but does not parse as the expected shape.
    #[error("slot '{slot}' holds unreadable data: {reason}")]
    Corrupt { slot: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Typed view over one storage key.
///
/// A missing key reads as `T::default()`. A key holding data that does not parse is
/// reported by [`Slot::read`] as [`SlotError::Corrupt`]; [`Slot::load`] degrades that
/// case to `T::default()` and logs it, which is what the services use.
pub struct Slot<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> core::fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slot").field("key", &self.key).finish()
    }
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Strict read: absent ⇒ default, unparsable ⇒ `Corrupt`.
    pub fn read(&self) -> Result<T, SlotError> {
        match self.storage.get(&self.key)? {
            None => Ok(T::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| SlotError::Corrupt {
                slot: self.key.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Lenient read: corrupt data is logged and replaced by `T::default()`.
    ///
    /// Backend failures still propagate.
    pub fn load(&self) -> Result<T, StorageError> {
        match self.read() {
            Ok(value) => Ok(value),
            Err(SlotError::Corrupt { slot, reason }) => {
                tracing::warn!(%slot, %reason, "discarding unreadable slot, treating as empty");
                Ok(T::default())
            }
            Err(SlotError::Storage(e)) => Err(e),
        }
    }

    /// Overwrite the whole document.
    pub fn save(&self, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.storage.set(&self.key, &raw)
    }
}
