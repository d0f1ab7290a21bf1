use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult, Entity, ItemId};

use crate::notification::OutOfStockNotice;

/// A purchasable product and its available stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Outcome of [`Inventory::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// The full item collection, persisted as a JSON array in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    /// Look up an item or fail with `NotFound`.
    pub fn require(&self, id: &ItemId) -> DomainResult<&Item> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found(format!("item {id}")))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.matches_name(name))
    }

    /// Insert-or-update keyed by case-insensitive name.
    ///
    /// An existing item keeps its id and original spelling; its quantity is overwritten
    /// (not incremented). The name is trimmed and must not be blank.
    pub fn upsert(&mut self, name: &str, quantity: u32) -> DomainResult<(ItemId, Upserted)> {
        self.upsert_with_id(name, quantity, ItemId::generate)
    }

    /// [`Inventory::upsert`] with an explicit id source for new items.
    pub fn upsert_with_id(
        &mut self,
        name: &str,
        quantity: u32,
        new_id: impl FnOnce() -> ItemId,
    ) -> DomainResult<(ItemId, Upserted)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("item name is required"));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.matches_name(name)) {
            existing.quantity = quantity;
            tracing::debug!(item_id = %existing.id, quantity, "updated item stock");
            return Ok((existing.id.clone(), Upserted::Updated));
        }

        let id = new_id();
        tracing::debug!(item_id = %id, name, quantity, "created item");
        self.items.push(Item::new(id.clone(), name, quantity));
        Ok((id, Upserted::Created))
    }

    /// Delete an item by id; returns the removed item, `None` if it was absent.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let pos = self.items.iter().position(|i| &i.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Case-insensitive substring search on item names. An empty filter matches all.
    ///
    /// The filter is used as typed; surrounding whitespace takes part in the match.
    pub fn search(&self, filter: &str) -> Vec<&Item> {
        let needle = filter.to_lowercase();
        self.items
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Items with no stock left, in inventory order.
    pub fn out_of_stock(&self) -> Vec<OutOfStockNotice> {
        self.items
            .iter()
            .filter(|i| i.is_out_of_stock())
            .map(OutOfStockNotice::from)
            .collect()
    }
}

impl From<Vec<Item>> for Inventory {
    fn from(items: Vec<Item>) -> Self {
        Self { items }
    }
}
