//! Basket domain module.
//!
//! A basket maps item ids to requested quantities. Every mutation is validated against
//! the live inventory handed in by the caller; nothing here touches storage.

pub mod basket;

pub use basket::{Basket, BasketLine, QuantityChange};
