//! # Inventory Statistics
//!
//! Aggregates shown on the dashboard and printed by the seed tool.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Sweet;

/// Summary of a collection at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryStats {
    /// Number of distinct records.
    pub total_sweets: usize,

    /// Units on hand across all records.
    pub total_units: i64,

    /// Σ price × in_stock, saturating at the `Money` range.
    pub total_value: Money,

    /// Mean unit price across records (not weighted by stock).
    pub average_price: Money,

    pub out_of_stock: usize,

    /// Records with `0 < in_stock <= LOW_STOCK_THRESHOLD`.
    pub low_stock: usize,

    /// Record count per category label.
    pub by_category: BTreeMap<String, usize>,
}

impl InventoryStats {
    /// Computes statistics for `sweets`.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::InventoryStats;
    ///
    /// let stats = InventoryStats::from_sweets(&[]);
    /// assert_eq!(stats.total_sweets, 0);
    /// assert!(stats.total_value.is_zero());
    /// ```
    pub fn from_sweets(sweets: &[Sweet]) -> Self {
        let mut stats = InventoryStats {
            total_sweets: sweets.len(),
            ..Default::default()
        };

        // i128: the sums can exceed i64 at the column bounds.
        let mut units: i128 = 0;
        let mut price_sum: i128 = 0;
        for sweet in sweets {
            units += i128::from(sweet.in_stock);
            price_sum += i128::from(sweet.price.cents());

            if sweet.is_out_of_stock() {
                stats.out_of_stock += 1;
            } else if sweet.is_low_stock() {
                stats.low_stock += 1;
            }

            *stats.by_category.entry(sweet.category.clone()).or_insert(0) += 1;
        }

        stats.total_units = units.clamp(0, i64::MAX as i128) as i64;
        stats.total_value = total_inventory_value(sweets);
        stats.average_price = average_cents(price_sum, sweets.len());
        stats
    }
}

/// Σ price × in_stock, saturating at the `Money` range.
pub fn total_inventory_value(sweets: &[Sweet]) -> Money {
    let total: i128 = sweets
        .iter()
        .map(|s| i128::from(s.price.cents()) * i128::from(s.in_stock))
        .sum();
    Money::from_cents_saturating(total)
}

fn average_cents(sum: i128, count: usize) -> Money {
    if count == 0 {
        return Money::zero();
    }
    let count = count as i128;
    Money::from_cents_saturating((sum + count / 2) / count)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sweet(id: i64, category: &str, cents: i64, in_stock: i64) -> Sweet {
        let now = Utc::now();
        Sweet {
            id,
            name: format!("Sweet {}", id),
            category: category.to_string(),
            price: Money::from_cents(cents),
            in_stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_from_sweets() {
        let sweets = vec![
            sweet(1, "chocolate", 350, 10),
            sweet(2, "chocolate", 299, 15),
            sweet(3, "candy", 199, 0),
            sweet(4, "candy", 100, 5),
        ];

        let stats = InventoryStats::from_sweets(&sweets);
        assert_eq!(stats.total_sweets, 4);
        assert_eq!(stats.total_units, 30);
        assert_eq!(stats.total_value.cents(), 3500 + 4485 + 500);
        assert_eq!(stats.average_price.cents(), 237);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.by_category.get("chocolate"), Some(&2));
        assert_eq!(stats.by_category.get("candy"), Some(&2));
    }

    #[test]
    fn test_total_value_matches_stats() {
        let sweets = vec![sweet(1, "a", 350, 10), sweet(2, "b", 299, 15)];
        assert_eq!(
            total_inventory_value(&sweets),
            InventoryStats::from_sweets(&sweets).total_value
        );
        assert_eq!(total_inventory_value(&sweets).cents(), 7985);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let max_price = 99_999_999_99;
        let max_stock = crate::validation::MAX_STOCK;
        let sweets = vec![
            sweet(1, "bulk", max_price, max_stock),
            sweet(2, "bulk", max_price, max_stock),
            sweet(3, "bulk", max_price, max_stock),
        ];

        let stats = InventoryStats::from_sweets(&sweets);
        assert_eq!(stats.total_units, 3 * max_stock);
        assert_eq!(stats.total_value.cents(), i64::MAX);
        assert_eq!(stats.average_price.cents(), max_price);
        assert_eq!(total_inventory_value(&sweets), stats.total_value);
    }

    #[test]
    fn test_large_total_below_saturation_is_exact() {
        let sweets = vec![sweet(1, "bulk", 10_000, crate::validation::MAX_STOCK)];
        assert_eq!(
            InventoryStats::from_sweets(&sweets).total_value.cents(),
            10_000 * crate::validation::MAX_STOCK
        );
    }

    #[test]
    fn test_empty_collection() {
        let stats = InventoryStats::from_sweets(&[]);
        assert_eq!(stats, InventoryStats::default());
    }

    #[test]
    fn test_serializes_money_as_decimal() {
        let stats = InventoryStats::from_sweets(&[sweet(1, "a", 250, 2)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_value"], serde_json::json!(5.0));
        assert_eq!(json["by_category"]["a"], serde_json::json!(1));
    }
}
