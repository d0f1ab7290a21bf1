//! Basket → order reconciliation against live inventory.
//!
//! Checkout runs in two passes:
//!
//! 1. **Validate** every basket entry (item exists, requested quantity fits in stock)
//!    without touching anything.
//! 2. **Commit**: deduct stock for every entry and snapshot the lines into an order.
//!
//! Any validation failure aborts before the commit pass, so a rejected checkout leaves
//! the inventory exactly as it was.

use chrono::{DateTime, Utc};

use shopfront_basket::Basket;
use shopfront_core::{DomainError, DomainResult, OrderId};
use shopfront_inventory::Inventory;

use crate::order::{Order, OrderLine, UserDetails};

/// Turn `basket` into an order, deducting the ordered quantities from `inventory`.
///
/// The caller is responsible for persisting the updated inventory, appending the order
/// and clearing the basket.
pub fn checkout(
    inventory: &mut Inventory,
    basket: &Basket,
    user_details: UserDetails,
    order_id: OrderId,
    now: DateTime<Utc>,
) -> DomainResult<Order> {
    if basket.is_empty() {
        return Err(DomainError::EmptyBasket);
    }

    let mut lines = Vec::with_capacity(basket.len());
    for (id, quantity) in basket.entries() {
        let item = inventory.require(id)?;
        if quantity > item.quantity {
            return Err(DomainError::invalid_quantity(format!(
                "order quantity for {} exceeds available stock",
                item.name
            )));
        }
        lines.push(OrderLine {
            id: id.clone(),
            name: item.name.clone(),
            quantity,
        });
    }

    for line in &lines {
        if let Some(item) = inventory.get_mut(&line.id) {
            item.quantity -= line.quantity;
        }
    }

    tracing::debug!(%order_id, lines = lines.len(), "basket reconciled against inventory");

    Ok(Order {
        id: order_id,
        user_details: Some(user_details),
        items: lines,
        date: now,
        delivered: false,
    })
}
