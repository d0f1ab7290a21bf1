//! Integration tests for the full service stack.
//!
//! Tests: service call → slots → storage → event bus
//!
//! Verifies:
//! - Basket and checkout scenarios against persisted state
//! - Rejected operations leave every slot untouched and publish nothing
//! - Corrupt slots degrade to empty collections

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use shopfront_basket::{Basket, QuantityChange};
    use shopfront_core::{DomainError, ItemId, OrderId};
    use shopfront_events::{EventBus, InMemoryEventBus, ShopEvent, Subscription, View};
    use shopfront_inventory::{Inventory, Item};
    use shopfront_orders::{Order, OrderLine, OrderLog, OrderStatus, UserDetails};

    use crate::config::{StorageBackend, StorageConfig, open_storage};
    use crate::services::{ServiceError, Storefront};
    use crate::slot::Slot;
    use crate::storage::{FileStorage, InMemoryStorage, KeyValueStorage, StorageError};

    type Bus = Arc<InMemoryEventBus<ShopEvent>>;

    struct Harness {
        shop: Storefront<Bus>,
        storage: Arc<InMemoryStorage>,
        config: StorageConfig,
        events: Subscription<ShopEvent>,
    }

    impl Harness {
        fn new() -> Self {
            shopfront_observability::tracing::init_pretty();
            let storage = Arc::new(InMemoryStorage::new());
            let config = StorageConfig::default();
            let bus: Bus = Arc::new(InMemoryEventBus::<ShopEvent>::new());
            let events = bus.subscribe();
            let shop = Storefront::new(storage.clone(), &config, bus);
            Self {
                shop,
                storage,
                config,
                events,
            }
        }

        fn with_items(items: Vec<Item>) -> Self {
            let h = Self::new();
            h.items_slot().save(&Inventory::from(items)).unwrap();
            h
        }

        fn items_slot(&self) -> Slot<Inventory> {
            Slot::new(self.storage.clone(), self.config.items_key())
        }

        fn basket_slot(&self) -> Slot<Basket> {
            Slot::new(self.storage.clone(), self.config.basket_key())
        }

        fn set_basket(&self, entries: &[(&str, u32)]) {
            let basket: Basket = entries
                .iter()
                .map(|(id, q)| (ItemId::from(*id), *q))
                .collect();
            self.basket_slot().save(&basket).unwrap();
        }

        /// Raw contents of all three slots.
        fn snapshot(&self) -> [Option<String>; 3] {
            [
                self.storage.get(&self.config.items_key()).unwrap(),
                self.storage.get(&self.config.basket_key()).unwrap(),
                self.storage.get(&self.config.orders_key()).unwrap(),
            ]
        }
    }

    fn pen(quantity: u32) -> Item {
        Item::new(ItemId::from("1"), "Pen", quantity)
    }

    fn details() -> UserDetails {
        UserDetails::new("Ada Lovelace", "12 Analytical Row", "555-0100").unwrap()
    }

    fn domain_err(err: ServiceError) -> DomainError {
        match err {
            ServiceError::Domain(e) => e,
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn scenario_a_add_to_empty_basket() {
        let h = Harness::with_items(vec![pen(5)]);

        assert_eq!(h.shop.basket().add(&ItemId::from("1")).unwrap(), 1);

        let basket = h.shop.basket().basket().unwrap();
        assert_eq!(basket.quantity_of(&ItemId::from("1")), Some(1));
        let events = h.events.drain();
        assert_eq!(events.len(), 1);
        assert!(events[0].affects(View::Basket));
        assert!(events[0].affects(View::CustomerItems));
    }

    #[test]
    fn scenario_b_add_beyond_stock_is_rejected() {
        let h = Harness::with_items(vec![pen(5)]);
        h.set_basket(&[("1", 5)]);
        let before = h.snapshot();

        let err = domain_err(h.shop.basket().add(&ItemId::from("1")).unwrap_err());

        assert_eq!(err, DomainError::MaxQuantityReached("Pen".into()));
        assert_eq!(h.snapshot(), before);
        assert!(h.events.drain().is_empty());
    }

    #[test]
    fn scenario_c_place_order_commits_everything() {
        let h = Harness::with_items(vec![pen(2)]);
        h.set_basket(&[("1", 2)]);

        let order = h.shop.orders().place_order(details()).unwrap();

        let inventory = h.shop.catalog().items().unwrap();
        assert_eq!(inventory.items()[0].quantity, 0);
        assert_eq!(
            order.items,
            vec![OrderLine {
                id: ItemId::from("1"),
                name: "Pen".into(),
                quantity: 2
            }]
        );
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(h.shop.orders().orders().unwrap().orders(), &[order.clone()]);
        assert!(h.shop.basket().basket().unwrap().is_empty());

        let notices = h.shop.catalog().out_of_stock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].to_string(), "Pen is out of stock!");

        let events = h.events.drain();
        assert_eq!(
            events,
            vec![ShopEvent::OrderPlaced {
                order_id: order.id.clone(),
                occurred_at: events[0].occurred_at(),
            }]
        );
    }

    #[test]
    fn scenario_d_deleted_item_aborts_checkout() {
        let h = Harness::with_items(vec![pen(5), Item::new(ItemId::from("2"), "Ink", 3)]);
        h.set_basket(&[("1", 1), ("2", 1)]);
        assert!(h.shop.catalog().remove(&ItemId::from("2")).unwrap().is_some());
        h.events.drain();
        let before = h.snapshot();

        let err = domain_err(h.shop.orders().place_order(details()).unwrap_err());

        assert!(err.is_not_found());
        assert_eq!(h.snapshot(), before);
        assert!(h.shop.orders().orders().unwrap().is_empty());
        assert!(h.events.drain().is_empty());
    }

    #[test]
    fn scenario_e_mark_delivered_twice() {
        let h = Harness::with_items(vec![pen(3)]);
        h.set_basket(&[("1", 1)]);
        let order = h.shop.orders().place_order(details()).unwrap();
        h.events.drain();

        h.shop.orders().mark_delivered(&order.id).unwrap();
        let after_first = h.snapshot();
        h.shop.orders().mark_delivered(&order.id).unwrap();

        assert_eq!(h.snapshot(), after_first);
        let log = h.shop.orders().orders().unwrap();
        assert!(log.get(&order.id).unwrap().delivered);
        assert_eq!(h.events.drain().len(), 1);
    }

    #[test]
    fn empty_basket_cannot_be_ordered() {
        let h = Harness::with_items(vec![pen(3)]);
        let err = domain_err(h.shop.orders().place_order(details()).unwrap_err());
        assert_eq!(err, DomainError::EmptyBasket);
    }

    #[test]
    fn stale_basket_quantity_is_caught_at_checkout() {
        let h = Harness::with_items(vec![pen(5)]);
        h.shop.basket().set_quantity(&ItemId::from("1"), 4).unwrap();
        h.shop.catalog().upsert("pen", 2).unwrap();
        let before = h.snapshot();

        let err = domain_err(h.shop.orders().place_order(details()).unwrap_err());

        assert!(matches!(err, DomainError::InvalidQuantity(ref msg) if msg.contains("Pen")));
        assert_eq!(h.snapshot(), before);
    }

    #[test]
    fn order_lines_survive_item_deletion() {
        let h = Harness::with_items(vec![pen(3)]);
        h.set_basket(&[("1", 1)]);
        let order = h.shop.orders().place_order(details()).unwrap();

        h.shop.catalog().remove(&ItemId::from("1")).unwrap();

        let log = h.shop.orders().orders().unwrap();
        assert_eq!(log.get(&order.id).unwrap().items[0].name, "Pen");
    }

    #[test]
    fn delete_order_removes_record_without_restocking() {
        let h = Harness::with_items(vec![pen(3)]);
        h.set_basket(&[("1", 2)]);
        let order = h.shop.orders().place_order(details()).unwrap();

        let removed = h.shop.orders().delete_order(&order.id).unwrap();

        assert_eq!(removed.id, order.id);
        assert!(h.shop.orders().orders().unwrap().is_empty());
        assert_eq!(h.shop.catalog().items().unwrap().items()[0].quantity, 1);
        let err = domain_err(h.shop.orders().delete_order(&order.id).unwrap_err());
        assert!(err.is_not_found());
    }

    #[test]
    fn basket_set_quantity_and_remove() {
        let h = Harness::with_items(vec![pen(5)]);
        let id = ItemId::from("1");

        assert_eq!(
            h.shop.basket().set_quantity(&id, 3).unwrap(),
            QuantityChange::Set(3)
        );
        let err = domain_err(h.shop.basket().set_quantity(&id, 6).unwrap_err());
        assert!(err.is_invalid_quantity());
        assert_eq!(h.shop.basket().basket().unwrap().quantity_of(&id), Some(3));

        let lines = h.shop.basket().lines().unwrap();
        assert_eq!(lines[0].name, "Pen");
        assert_eq!(lines[0].available, 5);

        assert!(h.shop.basket().remove(&id).unwrap());
        assert!(!h.shop.basket().remove(&id).unwrap());
        // set + remove published; the rejected set and the no-op remove did not
        assert_eq!(h.events.drain().len(), 2);
    }

    #[test]
    fn catalog_upsert_search_and_events() {
        let h = Harness::new();
        let pen_id = h.shop.catalog().upsert("Pen", 4).unwrap();
        let same = h.shop.catalog().upsert("PEN", 7).unwrap();
        h.shop.catalog().upsert("Notebook", 0).unwrap();

        assert_eq!(pen_id, same);
        let inventory = h.shop.catalog().items().unwrap();
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.get(&pen_id).unwrap().quantity, 7);
        assert_eq!(h.shop.catalog().search("note").unwrap().len(), 1);

        let events = h.events.drain();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.affects(View::AdminItems)));

        assert!(h.shop.catalog().remove(&ItemId::from("missing")).unwrap().is_none());
        assert!(h.events.drain().is_empty());
    }

    #[test]
    fn orders_without_user_details_survive_checkout() {
        let h = Harness::with_items(vec![pen(4)]);
        assert_eq!(h.shop.orders().orders().unwrap().len(), 0);
        let orders_slot: Slot<OrderLog> = Slot::new(h.storage.clone(), h.config.orders_key());
        assert_eq!(orders_slot.key(), "retailer-shop-orders");
        h.storage
            .set(
                orders_slot.key(),
                r#"[{"id":"1700000000000","items":[{"id":"1","name":"Pen","quantity":1}],
                    "date":"2024-05-31T16:08:37.171Z","delivered":false}]"#,
            )
            .unwrap();

        let before = h.shop.orders().orders().unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(before.orders()[0].recipient_name(), "N/A");

        h.shop.basket().add(&ItemId::from("1")).unwrap();
        let placed = h.shop.orders().place_order(details()).unwrap();

        let log = orders_slot.read().unwrap();
        assert_eq!(log.len(), 2);
        let legacy = log.get(&OrderId::from("1700000000000")).unwrap();
        assert_eq!(legacy.user_details, None);
        assert_eq!(log.get(&placed.id).unwrap().recipient_name(), "Ada Lovelace");
    }

    #[test]
    fn rejected_add_exposes_domain_error() {
        let h = Harness::with_items(vec![pen(0)]);
        let err = h.shop.basket().add(&ItemId::from("1")).unwrap_err();
        assert!(err.is_user_facing());
        assert_eq!(err.domain(), Some(&DomainError::OutOfStock("Pen".into())));
    }

    #[test]
    fn corrupt_slots_degrade_to_empty() {
        let h = Harness::new();
        h.storage.set(&h.config.items_key(), "not json").unwrap();
        h.storage.set(&h.config.basket_key(), "[1,2").unwrap();
        h.storage.set(&h.config.orders_key(), "{}").unwrap();

        assert!(h.shop.catalog().items().unwrap().is_empty());
        assert!(h.shop.basket().basket().unwrap().is_empty());
        assert!(h.shop.orders().orders().unwrap().is_empty());

        // Writing over a corrupt slot replaces it with valid data.
        h.shop.catalog().upsert("Pen", 1).unwrap();
        assert!(h.items_slot().read().is_ok());
    }

    /// Storage that fails writes to one key while `armed` is set.
    struct FailingStorage {
        inner: InMemoryStorage,
        failing_key: String,
        armed: AtomicBool,
        rejected: AtomicUsize,
    }

    impl KeyValueStorage for FailingStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.failing_key && self.armed.load(Ordering::SeqCst) {
                self.rejected.fetch_add(1, Ordering::SeqCst);
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn rollback_case(failing_key: String) {
        let config = StorageConfig::default();
        let storage = Arc::new(FailingStorage {
            inner: InMemoryStorage::new(),
            failing_key,
            armed: AtomicBool::new(false),
            rejected: AtomicUsize::new(0),
        });
        let bus: Bus = Arc::new(InMemoryEventBus::<ShopEvent>::new());
        let events = bus.subscribe();
        let shop = Storefront::new(storage.clone(), &config, bus);

        shop.catalog().upsert("Pen", 3).unwrap();
        let pen_id = shop.catalog().items().unwrap().items()[0].id.clone();
        shop.basket().set_quantity(&pen_id, 2).unwrap();
        events.drain();
        let before: Vec<_> = [config.items_key(), config.basket_key()]
            .iter()
            .map(|k| storage.get(k).unwrap())
            .collect();

        storage.armed.store(true, Ordering::SeqCst);
        let err = shop.orders().place_order(details()).unwrap_err();
        storage.armed.store(false, Ordering::SeqCst);

        assert!(!err.is_user_facing());
        assert!(err.domain().is_none());
        // Only the failing save itself hit the key; the restore left it alone.
        assert_eq!(storage.rejected.load(Ordering::SeqCst), 1);
        let after: Vec<_> = [config.items_key(), config.basket_key()]
            .iter()
            .map(|k| storage.get(k).unwrap())
            .collect();
        assert_eq!(after, before);
        assert!(shop.orders().orders().unwrap().is_empty());
        assert!(events.drain().is_empty());
    }

    #[test]
    fn failed_order_write_restores_inventory() {
        rollback_case(StorageConfig::default().orders_key());
    }

    #[test]
    fn failed_basket_clear_restores_inventory_and_orders() {
        rollback_case(StorageConfig::default().basket_key());
    }

    #[test]
    fn file_backend_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File {
                dir: dir.path().to_path_buf(),
            },
            ..StorageConfig::default()
        };

        let order_id: OrderId = {
            let storage = open_storage(&config).unwrap();
            let shop = Storefront::new(storage, &config, InMemoryEventBus::<ShopEvent>::new());
            let id = shop.catalog().upsert("Pen", 2).unwrap();
            shop.basket().add(&id).unwrap();
            shop.orders().place_order(details()).unwrap().id
        };

        let reopened = Storefront::new(
            Arc::new(FileStorage::new(dir.path())),
            &config,
            InMemoryEventBus::<ShopEvent>::new(),
        );
        let log: OrderLog = reopened.orders().orders().unwrap();
        let order: &Order = log.get(&order_id).unwrap();
        assert_eq!(order.user_details, Some(details()));
        assert_eq!(reopened.catalog().items().unwrap().items()[0].quantity, 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: a rejected checkout leaves every slot byte-for-byte unchanged.
            #[test]
            fn rejected_checkout_changes_nothing(
                stocks in proptest::collection::vec(0u32..4, 1..4),
                wants in proptest::collection::vec(1u32..6, 1..5),
            ) {
                let items: Vec<Item> = stocks
                    .iter()
                    .enumerate()
                    .map(|(i, s)| Item::new(ItemId::from(i.to_string().as_str()), format!("item{i}"), *s))
                    .collect();
                let h = Harness::with_items(items);
                let ids: Vec<String> = (0..wants.len()).map(|i| i.to_string()).collect();
                let entries: Vec<(&str, u32)> = ids.iter().map(String::as_str).zip(wants.iter().copied()).collect();
                h.set_basket(&entries);
                let before = h.snapshot();

                match h.shop.orders().place_order(details()) {
                    Ok(order) => {
                        prop_assert_eq!(order.items.len(), wants.len());
                        prop_assert!(h.shop.basket().basket().unwrap().is_empty());
                    }
                    Err(err) => {
                        prop_assert!(err.is_user_facing());
                        prop_assert_eq!(h.snapshot(), before);
                    }
                }
            }
        }
    }
}
