use std::sync::Arc;

use chrono::Utc;

use shopfront_core::ItemId;
use shopfront_events::{EventBus, ShopEvent};
use shopfront_inventory::{Inventory, Item, OutOfStockNotice};

use super::{ServiceResult, ShopContext};

/// Admin-side inventory management plus the customer item browser queries.
#[derive(Debug)]
pub struct CatalogService<B> {
    ctx: Arc<ShopContext<B>>,
}

impl<B> CatalogService<B>
where
    B: EventBus<ShopEvent>,
{
    pub fn new(ctx: Arc<ShopContext<B>>) -> Self {
        Self { ctx }
    }

    pub fn items(&self) -> ServiceResult<Inventory> {
        Ok(self.ctx.stores().items.load()?)
    }

    /// Create an item, or overwrite the stock of the item with the same name.
    pub fn upsert(&self, name: &str, quantity: u32) -> ServiceResult<ItemId> {
        let _guard = self.ctx.lock()?;
        let mut inventory = self.ctx.stores().items.load()?;
        let (item_id, outcome) = inventory.upsert(name, quantity)?;
        self.ctx.stores().items.save(&inventory)?;

        tracing::info!(%item_id, quantity, ?outcome, "item saved");
        self.ctx.publish(ShopEvent::ItemUpserted {
            item_id: item_id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(item_id)
    }

    /// Delete an item. Baskets and orders that reference it are left alone.
    pub fn remove(&self, id: &ItemId) -> ServiceResult<Option<Item>> {
        let _guard = self.ctx.lock()?;
        let mut inventory = self.ctx.stores().items.load()?;
        let Some(removed) = inventory.remove(id) else {
            return Ok(None);
        };
        self.ctx.stores().items.save(&inventory)?;

        tracing::info!(item_id = %id, "item deleted");
        self.ctx.publish(ShopEvent::ItemRemoved {
            item_id: id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(Some(removed))
    }

    /// Items whose name contains `filter`, ignoring case.
    pub fn search(&self, filter: &str) -> ServiceResult<Vec<Item>> {
        let inventory = self.items()?;
        Ok(inventory.search(filter).into_iter().cloned().collect())
    }

    pub fn out_of_stock(&self) -> ServiceResult<Vec<OutOfStockNotice>> {
        Ok(self.items()?.out_of_stock())
    }
}
