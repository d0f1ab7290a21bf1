use std::sync::Arc;

use chrono::Utc;

use shopfront_basket::{Basket, BasketLine, QuantityChange};
use shopfront_core::ItemId;
use shopfront_events::{EventBus, ShopEvent};

use super::{ServiceResult, ShopContext};

/// Customer basket operations, validated against live inventory.
#[derive(Debug)]
pub struct BasketService<B> {
    ctx: Arc<ShopContext<B>>,
}

impl<B> BasketService<B>
where
    B: EventBus<ShopEvent>,
{
    pub fn new(ctx: Arc<ShopContext<B>>) -> Self {
        Self { ctx }
    }

    pub fn basket(&self) -> ServiceResult<Basket> {
        Ok(self.ctx.stores().basket.load()?)
    }

    /// Basket entries joined with current item names and stock.
    pub fn lines(&self) -> ServiceResult<Vec<BasketLine>> {
        let basket = self.basket()?;
        let inventory = self.ctx.stores().items.load()?;
        Ok(basket.lines(&inventory))
    }

    /// Add one unit; returns the new basket quantity.
    pub fn add(&self, id: &ItemId) -> ServiceResult<u32> {
        let _guard = self.ctx.lock()?;
        let inventory = self.ctx.stores().items.load()?;
        let mut basket = self.ctx.stores().basket.load()?;

        let quantity = basket.add(&inventory, id)?;
        self.ctx.stores().basket.save(&basket)?;

        self.changed();
        Ok(quantity)
    }

    pub fn set_quantity(&self, id: &ItemId, quantity: i64) -> ServiceResult<QuantityChange> {
        let _guard = self.ctx.lock()?;
        let inventory = self.ctx.stores().items.load()?;
        let mut basket = self.ctx.stores().basket.load()?;

        let change = basket.set_quantity(&inventory, id, quantity)?;
        if change == QuantityChange::Removed(false) {
            return Ok(change);
        }
        self.ctx.stores().basket.save(&basket)?;

        self.changed();
        Ok(change)
    }

    /// Drop an entry; returns whether there was one.
    pub fn remove(&self, id: &ItemId) -> ServiceResult<bool> {
        let _guard = self.ctx.lock()?;
        let mut basket = self.ctx.stores().basket.load()?;
        if !basket.remove(id) {
            return Ok(false);
        }
        self.ctx.stores().basket.save(&basket)?;

        self.changed();
        Ok(true)
    }

    fn changed(&self) {
        self.ctx.publish(ShopEvent::BasketChanged {
            occurred_at: Utc::now(),
        });
    }
}
