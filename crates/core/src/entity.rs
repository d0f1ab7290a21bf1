//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Items and orders are entities: an item keeps its id across renames and stock
/// changes, an order keeps its id while its delivery flag flips.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
