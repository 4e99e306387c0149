//! # Stock Ledger
//!
//! Purchase and restock arithmetic on a single record's `in_stock`.
//!
//! Both stores (in-memory and SQLite) look the record up, hand it to this
//! module, and write back the stock level it returns. The order of checks
//! therefore lives here and nowhere else:
//!
//! ```text
//! purchase(id, qty)                   restock(id, qty)
//!   1. record exists?   → NotFound      1. qty > 0?         → Validation
//!   2. qty > 0?         → Validation    2. record exists?   → NotFound
//!   3. qty <= in_stock? → Insufficient  3. in_stock + qty <= MAX_STOCK?
//!   4. in_stock - qty                                       → OutOfRange
//! ```
//!
//! A failed check never yields a new stock level, so callers that only
//! write on `Ok` leave the record untouched.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Sweet, SweetId};
use crate::validation::{validate_quantity, validate_stock};

/// A requested change to a record's stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "quantity", rename_all = "snake_case")]
pub enum StockChange {
    /// Sell units; bounded by availability.
    Purchase(i64),
    /// Receive units; bounded by `MAX_STOCK`.
    Restock(i64),
}

impl StockChange {
    /// Computes the new stock level for `current`, which is `None` when the
    /// lookup for `id` found nothing.
    pub fn apply(self, id: SweetId, current: Option<&Sweet>) -> CoreResult<i64> {
        match self {
            StockChange::Purchase(quantity) => purchase(id, current, quantity),
            StockChange::Restock(quantity) => restock(id, current, quantity),
        }
    }
}

/// New stock level after selling `quantity` units.
pub fn purchase(id: SweetId, current: Option<&Sweet>, quantity: i64) -> CoreResult<i64> {
    let sweet = current.ok_or(CoreError::SweetNotFound(id))?;
    validate_quantity(quantity)?;

    if quantity > sweet.in_stock {
        return Err(CoreError::InsufficientStock {
            id,
            available: sweet.in_stock,
            requested: quantity,
        });
    }

    Ok(sweet.in_stock - quantity)
}

/// New stock level after receiving `quantity` units.
pub fn restock(id: SweetId, current: Option<&Sweet>, quantity: i64) -> CoreResult<i64> {
    validate_quantity(quantity)?;
    let sweet = current.ok_or(CoreError::SweetNotFound(id))?;

    let new_level = sweet
        .in_stock
        .checked_add(quantity)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "in_stock".to_string(),
        })?;
    validate_stock(new_level)?;
    Ok(new_level)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::validation::MAX_STOCK;
    use chrono::Utc;

    fn sweet(in_stock: i64) -> Sweet {
        let now = Utc::now();
        Sweet {
            id: 3,
            name: "Chocolate Bar".to_string(),
            category: "chocolate".to_string(),
            price: Money::from_cents(250),
            in_stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_purchase_decrements() {
        assert_eq!(purchase(3, Some(&sweet(10)), 3), Ok(7));
        assert_eq!(purchase(3, Some(&sweet(10)), 10), Ok(0));
    }

    #[test]
    fn test_purchase_insufficient_stock() {
        assert_eq!(
            purchase(3, Some(&sweet(5)), 10),
            Err(CoreError::InsufficientStock {
                id: 3,
                available: 5,
                requested: 10
            })
        );
    }

    #[test]
    fn test_purchase_check_order() {
        // Missing record wins over a bad quantity.
        assert_eq!(purchase(3, None, 0), Err(CoreError::SweetNotFound(3)));
        // Bad quantity wins over insufficient stock.
        assert!(matches!(
            purchase(3, Some(&sweet(0)), 0),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_restock_increments() {
        assert_eq!(restock(3, Some(&sweet(5)), 10), Ok(15));
    }

    #[test]
    fn test_restock_check_order() {
        // Bad quantity wins over a missing record.
        assert!(matches!(
            restock(3, None, 0),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert_eq!(restock(3, None, 4), Err(CoreError::SweetNotFound(3)));
    }

    #[test]
    fn test_restock_beyond_max_stock() {
        assert_eq!(restock(3, Some(&sweet(MAX_STOCK - 1)), 1), Ok(MAX_STOCK));
        assert!(matches!(
            restock(3, Some(&sweet(MAX_STOCK)), 1),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(matches!(
            restock(3, Some(&sweet(i64::MAX)), 1),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_stock_change_dispatch() {
        let current = sweet(8);
        assert_eq!(StockChange::Purchase(2).apply(3, Some(&current)), Ok(6));
        assert_eq!(StockChange::Restock(2).apply(3, Some(&current)), Ok(10));
    }
}
