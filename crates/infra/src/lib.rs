//! Infrastructure layer: storage backends, typed slots, config, and the services that
//! tie the domain crates to persisted state.

pub mod config;
pub mod services;
pub mod slot;
pub mod storage;

#[cfg(test)]
mod integration_tests;

pub use config::{StorageBackend, StorageConfig, open_storage};
pub use services::{
    BasketService, CatalogService, OrderService, ServiceError, ServiceResult, ShopContext,
    ShopStores, Storefront,
};
pub use slot::{Slot, SlotError};
pub use storage::{FileStorage, InMemoryStorage, KeyValueStorage, StorageError};
