use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult, ItemId};
use shopfront_inventory::Inventory;

/// Requested quantities keyed by item id, persisted as a JSON object.
///
/// Invariant after any successful mutation: every touched entry holds a quantity in
/// `[1, item.quantity]`. Entries are not revalidated when inventory later shrinks, so a
/// loaded basket may be stale; checkout revalidates everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Basket {
    entries: BTreeMap<ItemId, u32>,
}

/// Outcome of [`Basket::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The entry now holds this quantity.
    Set(u32),
    /// A quantity below one removed the entry (`true` if there was one).
    Removed(bool),
}

/// A basket entry joined with the live item it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    /// Stock currently available for the item.
    pub available: u32,
}

impl BasketLine {
    /// True if the requested quantity no longer fits in stock.
    pub fn exceeds_stock(&self) -> bool {
        self.quantity > self.available
    }
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn quantity_of(&self, id: &ItemId) -> Option<u32> {
        self.entries.get(id).copied()
    }

    /// Entries in id order.
    pub fn entries(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.entries.iter().map(|(id, qty)| (id, *qty))
    }

    /// Add one unit of an item.
    ///
    /// Fails with `NotFound` for unknown items, `OutOfStock` when the item has no stock,
    /// and `MaxQuantityReached` when the basket already holds all available units.
    /// Returns the new basket quantity.
    pub fn add(&mut self, inventory: &Inventory, id: &ItemId) -> DomainResult<u32> {
        let item = inventory.require(id)?;
        if item.is_out_of_stock() {
            return Err(DomainError::OutOfStock(item.name.clone()));
        }

        let next = match self.entries.get(id) {
            Some(&current) if current < item.quantity => current + 1,
            Some(_) => return Err(DomainError::MaxQuantityReached(item.name.clone())),
            None => 1,
        };

        self.entries.insert(id.clone(), next);
        tracing::debug!(item_id = %id, quantity = next, "added to basket");
        Ok(next)
    }

    /// Overwrite the requested quantity of an item.
    ///
    /// The item must exist. A quantity below one removes the entry; a quantity above the
    /// item's stock fails with `InvalidQuantity` and leaves the basket unchanged.
    pub fn set_quantity(
        &mut self,
        inventory: &Inventory,
        id: &ItemId,
        quantity: i64,
    ) -> DomainResult<QuantityChange> {
        let item = inventory.require(id)?;

        if quantity < 1 {
            return Ok(QuantityChange::Removed(self.remove(id)));
        }
        if quantity > i64::from(item.quantity) {
            return Err(DomainError::invalid_quantity(format!(
                "{quantity} exceeds available stock of {} ({})",
                item.name, item.quantity
            )));
        }

        // Bounded by item.quantity above.
        let quantity = quantity as u32;
        self.entries.insert(id.clone(), quantity);
        tracing::debug!(item_id = %id, quantity, "set basket quantity");
        Ok(QuantityChange::Set(quantity))
    }

    /// Remove an entry; returns whether one was present.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries joined with live inventory. Entries whose item no longer exists are
    /// skipped.
    pub fn lines(&self, inventory: &Inventory) -> Vec<BasketLine> {
        self.entries
            .iter()
            .filter_map(|(id, &quantity)| {
                inventory.get(id).map(|item| BasketLine {
                    item_id: id.clone(),
                    name: item.name.clone(),
                    quantity,
                    available: item.quantity,
                })
            })
            .collect()
    }
}

impl FromIterator<(ItemId, u32)> for Basket {
    fn from_iter<T: IntoIterator<Item = (ItemId, u32)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
