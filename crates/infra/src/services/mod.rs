//! Application services: load state, run domain logic, persist, then notify.
//!
//! Every mutating operation follows the same shape:
//!
//! ```text
//! lock → load slots → domain operation → save slots → publish ShopEvent
//! ```
//!
//! A rejected operation returns before anything is saved or published. Publication
//! happens only after the write succeeded; a failed publish is logged, not returned,
//! because the state change already happened.

pub mod basket;
pub mod catalog;
pub mod orders;

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use shopfront_basket::Basket;
use shopfront_core::DomainError;
use shopfront_events::{EventBus, ShopEvent};
use shopfront_inventory::Inventory;
use shopfront_orders::OrderLog;

use crate::config::StorageConfig;
use crate::slot::Slot;
use crate::storage::{KeyValueStorage, StorageError};

pub use basket::BasketService;
pub use catalog::CatalogService;
pub use orders::OrderService;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The operation was rejected by a business rule; nothing changed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// True for rejections the user caused and can act on.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ServiceError::Domain(_))
    }

    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            ServiceError::Storage(_) => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// The three persisted documents.
#[derive(Debug, Clone)]
pub struct ShopStores {
    pub items: Slot<Inventory>,
    pub basket: Slot<Basket>,
    pub orders: Slot<OrderLog>,
}

impl ShopStores {
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: &StorageConfig) -> Self {
        Self {
            items: Slot::new(storage.clone(), config.items_key()),
            basket: Slot::new(storage.clone(), config.basket_key()),
            orders: Slot::new(storage, config.orders_key()),
        }
    }
}

/// State shared by all services of one storefront.
#[derive(Debug)]
pub struct ShopContext<B> {
    stores: ShopStores,
    bus: B,
    write_lock: Mutex<()>,
}

impl<B> ShopContext<B>
where
    B: EventBus<ShopEvent>,
{
    pub fn new(stores: ShopStores, bus: B) -> Self {
        Self {
            stores,
            bus,
            write_lock: Mutex::new(()),
        }
    }

    pub fn stores(&self) -> &ShopStores {
        &self.stores
    }

    /// Serialise read-modify-write cycles within this process.
    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock.lock().map_err(|_| StorageError::Poisoned)
    }

    fn publish(&self, event: ShopEvent) {
        let event_type = event.event_type();
        if let Err(err) = self.bus.publish(event) {
            tracing::warn!(event_type, ?err, "state changed but notification was not delivered");
        }
    }
}

/// Entry point wiring storage, configuration and the bus into the three services.
#[derive(Debug)]
pub struct Storefront<B> {
    ctx: Arc<ShopContext<B>>,
}

impl<B> Clone for Storefront<B> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
        }
    }
}

impl<B> Storefront<B>
where
    B: EventBus<ShopEvent>,
{
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: &StorageConfig, bus: B) -> Self {
        Self {
            ctx: Arc::new(ShopContext::new(ShopStores::new(storage, config), bus)),
        }
    }

    pub fn catalog(&self) -> CatalogService<B> {
        CatalogService::new(self.ctx.clone())
    }

    pub fn basket(&self) -> BasketService<B> {
        BasketService::new(self.ctx.clone())
    }

    pub fn orders(&self) -> OrderService<B> {
        OrderService::new(self.ctx.clone())
    }
}
