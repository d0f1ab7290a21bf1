use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{ItemId, OrderId};

/// A rendering surface that depends on persisted storefront state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Admin inventory list.
    AdminItems,
    /// Admin out-of-stock notifications.
    Notifications,
    /// Customer item browser.
    CustomerItems,
    /// Customer basket.
    Basket,
    /// Order tracking list.
    Orders,
}

/// "State changed" signal emitted after a successful, persisted mutation.
///
/// Events are facts: they are only published once the write went through, and a
/// rejected operation publishes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShopEvent {
    ItemUpserted {
        item_id: ItemId,
        occurred_at: DateTime<Utc>,
    },
    ItemRemoved {
        item_id: ItemId,
        occurred_at: DateTime<Utc>,
    },
    BasketChanged {
        occurred_at: DateTime<Utc>,
    },
    OrderPlaced {
        order_id: OrderId,
        occurred_at: DateTime<Utc>,
    },
    OrderDelivered {
        order_id: OrderId,
        occurred_at: DateTime<Utc>,
    },
    OrderDeleted {
        order_id: OrderId,
        occurred_at: DateTime<Utc>,
    },
}

impl ShopEvent {
    /// Stable event name (e.g. "basket.changed").
    pub fn event_type(&self) -> &'static str {
        match self {
            ShopEvent::ItemUpserted { .. } => "inventory.item.upserted",
            ShopEvent::ItemRemoved { .. } => "inventory.item.removed",
            ShopEvent::BasketChanged { .. } => "basket.changed",
            ShopEvent::OrderPlaced { .. } => "orders.order.placed",
            ShopEvent::OrderDelivered { .. } => "orders.order.delivered",
            ShopEvent::OrderDeleted { .. } => "orders.order.deleted",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ShopEvent::ItemUpserted { occurred_at, .. }
            | ShopEvent::ItemRemoved { occurred_at, .. }
            | ShopEvent::BasketChanged { occurred_at }
            | ShopEvent::OrderPlaced { occurred_at, .. }
            | ShopEvent::OrderDelivered { occurred_at, .. }
            | ShopEvent::OrderDeleted { occurred_at, .. } => *occurred_at,
        }
    }

    /// Surfaces a subscriber should redraw in response to this event.
    pub fn affected_views(&self) -> &'static [View] {
        match self {
            ShopEvent::ItemUpserted { .. } | ShopEvent::ItemRemoved { .. } => {
                &[View::AdminItems, View::Notifications, View::CustomerItems]
            }
            ShopEvent::BasketChanged { .. } => &[View::Basket, View::CustomerItems],
            ShopEvent::OrderPlaced { .. } => &[
                View::CustomerItems,
                View::Basket,
                View::AdminItems,
                View::Notifications,
                View::Orders,
            ],
            ShopEvent::OrderDelivered { .. } | ShopEvent::OrderDeleted { .. } => &[View::Orders],
        }
    }

    pub fn affects(&self, view: View) -> bool {
        self.affected_views().contains(&view)
    }
}
