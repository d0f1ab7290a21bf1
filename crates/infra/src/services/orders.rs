use std::sync::Arc;

use chrono::Utc;

use shopfront_basket::Basket;
use shopfront_core::OrderId;
use shopfront_events::{EventBus, ShopEvent};
use shopfront_inventory::Inventory;
use shopfront_orders::{Order, OrderLog, UserDetails, checkout};

use super::{ServiceResult, ShopContext};
use crate::storage::StorageError;

/// Checkout and order tracking.
#[derive(Debug)]
pub struct OrderService<B> {
    ctx: Arc<ShopContext<B>>,
}

impl<B> OrderService<B>
where
    B: EventBus<ShopEvent>,
{
    pub fn new(ctx: Arc<ShopContext<B>>) -> Self {
        Self { ctx }
    }

    pub fn orders(&self) -> ServiceResult<OrderLog> {
        Ok(self.ctx.stores().orders.load()?)
    }

    /// Turn the current basket into an order.
    ///
    /// On success the stock is deducted, the order is appended to the log and the basket
    /// is emptied. On any failure none of the three documents changes: domain rejections
    /// happen before the first write, and a failed write restores what was already
    /// written.
    pub fn place_order(&self, user_details: UserDetails) -> ServiceResult<Order> {
        let _guard = self.ctx.lock()?;
        let stores = self.ctx.stores();

        let basket = stores.basket.load()?;
        let mut inventory = stores.items.load()?;
        let mut log = stores.orders.load()?;
        let previous_inventory = inventory.clone();
        let previous_log = log.clone();

        let order = checkout(
            &mut inventory,
            &basket,
            user_details,
            OrderId::generate(),
            Utc::now(),
        )?;

        stores.items.save(&inventory)?;

        log.append(order.clone());
        if let Err(err) = stores.orders.save(&log) {
            self.roll_back(Some(&previous_inventory), None);
            return Err(err.into());
        }

        if let Err(err) = stores.basket.save(&Basket::new()) {
            self.roll_back(Some(&previous_inventory), Some(&previous_log));
            return Err(err.into());
        }

        tracing::info!(
            order_id = %order.id,
            lines = order.items.len(),
            units = order.total_units(),
            "order placed"
        );
        self.ctx.publish(ShopEvent::OrderPlaced {
            order_id: order.id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(order)
    }

    /// Flag an order as delivered. Repeating this on a delivered order is a no-op.
    pub fn mark_delivered(&self, id: &OrderId) -> ServiceResult<()> {
        let _guard = self.ctx.lock()?;
        let mut log = self.ctx.stores().orders.load()?;
        if !log.mark_delivered(id)? {
            tracing::debug!(order_id = %id, "order already delivered");
            return Ok(());
        }
        self.ctx.stores().orders.save(&log)?;

        tracing::info!(order_id = %id, "order delivered");
        self.ctx.publish(ShopEvent::OrderDelivered {
            order_id: id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    /// Permanently remove an order record. Stock is not returned.
    pub fn delete_order(&self, id: &OrderId) -> ServiceResult<Order> {
        let _guard = self.ctx.lock()?;
        let mut log = self.ctx.stores().orders.load()?;
        let removed = log.delete(id)?;
        self.ctx.stores().orders.save(&log)?;

        tracing::info!(order_id = %id, "order deleted");
        self.ctx.publish(ShopEvent::OrderDeleted {
            order_id: id.clone(),
            occurred_at: Utc::now(),
        });
        Ok(removed)
    }

    /// Restore slots written before a failed save. The basket is always the last write,
    /// so it never needs restoring.
    fn roll_back(&self, inventory: Option<&Inventory>, log: Option<&OrderLog>) {
        let stores = self.ctx.stores();
        let results: [(&str, Option<Result<(), StorageError>>); 2] = [
            ("items", inventory.map(|v| stores.items.save(v))),
            ("orders", log.map(|v| stores.orders.save(v))),
        ];
        for (slot, result) in results {
            if let Some(Err(err)) = result {
                tracing::error!(slot, %err, "failed to restore slot after aborted checkout");
            }
        }
    }
}
