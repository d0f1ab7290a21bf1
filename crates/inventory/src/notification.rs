//! Read-only projection feeding the admin out-of-stock list.

use serde::{Deserialize, Serialize};

use shopfront_core::ItemId;

use crate::item::Item;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfStockNotice {
    pub item_id: ItemId,
    pub name: String,
}

impl From<&Item> for OutOfStockNotice {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
        }
    }
}

impl core::fmt::Display for OutOfStockNotice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} is out of stock!", self.name)
    }
}
