//! Orders domain module.
//!
//! This crate contains the order record, the order log, and the checkout
//! reconciliation that turns a basket into an order while deducting stock. All of it
//! is deterministic domain logic (no IO, no storage).

pub mod checkout;
pub mod order;

pub use checkout::checkout;
pub use order::{Order, OrderLine, OrderLog, OrderStatus, UserDetails};
