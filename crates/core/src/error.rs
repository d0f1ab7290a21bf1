//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, user-facing failures (validation, missing
/// references, stock limits). Storage concerns belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank name, missing delivery details).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced item or order does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A quantity was non-numeric, negative, or exceeds available stock.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// The item has no stock left, so it cannot be added to a basket.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// The basket already holds every unit the item has in stock.
    #[error("max quantity reached for {0}")]
    MaxQuantityReached(String),

    /// Checkout was attempted with an empty basket.
    #[error("basket is empty")]
    EmptyBasket,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    /// True for every failure caused by a quantity outside what stock allows.
    pub fn is_invalid_quantity(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity(_) | Self::OutOfStock(_) | Self::MaxQuantityReached(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
