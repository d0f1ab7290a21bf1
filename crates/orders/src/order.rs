use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult, Entity, ItemId, OrderId, ValueObject};

/// Delivery details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl UserDetails {
    /// Build delivery details, trimming each field. Every field is required.
    pub fn new(
        name: impl AsRef<str>,
        address: impl AsRef<str>,
        phone: impl AsRef<str>,
    ) -> DomainResult<Self> {
        let name = name.as_ref().trim();
        let address = address.as_ref().trim();
        let phone = phone.as_ref().trim();
        if name.is_empty() || address.is_empty() || phone.is_empty() {
            return Err(DomainError::validation(
                "name, address and phone are all required for delivery",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
        })
    }
}

impl ValueObject for UserDetails {}

/// Snapshot of one basket entry at checkout. The name does not follow later renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
}

impl ValueObject for OrderLine {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivered,
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OrderStatus::Pending => f.write_str("Pending"),
            OrderStatus::Delivered => f.write_str("Delivered"),
        }
    }
}

/// A placed order. Only `delivered` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Absent on some orders saved by earlier clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_details: Option<UserDetails>,
    pub items: Vec<OrderLine>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub delivered: bool,
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        if self.delivered {
            OrderStatus::Delivered
        } else {
            OrderStatus::Pending
        }
    }

    /// Recipient name for display, `N/A` when no delivery details were saved.
    pub fn recipient_name(&self) -> &str {
        self.user_details
            .as_ref()
            .map_or("N/A", |d| d.name.as_str())
    }

    /// Total units across all lines.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Append-only list of placed orders, persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLog {
    orders: Vec<Order>,
}

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    pub fn append(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Flag an order as delivered.
    ///
    /// Returns `Ok(true)` if the flag changed and `Ok(false)` if it was already set.
    pub fn mark_delivered(&mut self, id: &OrderId) -> DomainResult<bool> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))?;
        if order.delivered {
            return Ok(false);
        }
        order.delivered = true;
        Ok(true)
    }

    /// Remove an order permanently and return it.
    pub fn delete(&mut self, id: &OrderId) -> DomainResult<Order> {
        let pos = self
            .orders
            .iter()
            .position(|o| &o.id == id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))?;
        Ok(self.orders.remove(pos))
    }

    /// Orders still awaiting delivery.
    pub fn pending(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| !o.delivered)
    }
}
