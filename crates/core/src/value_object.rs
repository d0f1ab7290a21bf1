//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. In the storefront the
/// delivery details attached to an order and the line snapshots copied into it are value
/// objects: once an order is placed they never change, even if the item they were copied
/// from is renamed or deleted.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct OrderLine {
///     id: ItemId,
///     name: String,
///     quantity: u32,
/// }
///
/// impl ValueObject for OrderLine {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
