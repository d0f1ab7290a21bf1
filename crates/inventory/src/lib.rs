//! Inventory domain module.
//!
//! This crate contains business rules for stock keeping, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod item;
pub mod notification;

pub use item::{Inventory, Item, Upserted};
pub use notification::OutOfStockNotice;
