//! Quantity input parsing.

use crate::error::{DomainError, DomainResult};

/// Parse a stock quantity typed by an operator.
///
/// Accepts a non-negative whole number (surrounding whitespace ignored). Anything else is
/// an `InvalidQuantity`.
pub fn parse_quantity(input: &str) -> DomainResult<u32> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| DomainError::invalid_quantity(format!("'{trimmed}' is not a number")))?;
    if value < 0 {
        return Err(DomainError::invalid_quantity("quantity must be non-negative"));
    }
    u32::try_from(value).map_err(|_| DomainError::invalid_quantity("quantity is too large"))
}
