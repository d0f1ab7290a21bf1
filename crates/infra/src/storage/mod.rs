//! Key/value storage boundary.
//!
//! The storefront keeps three JSON documents (items, basket, orders) under fixed keys.
//! This module defines the backend abstraction and two implementations.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::FileStorage;
pub use in_memory::InMemoryStorage;
pub use r#trait::{KeyValueStorage, StorageError};
