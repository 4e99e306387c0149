//! # Domain Types
//!
//! Core domain types used throughout SweetShop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Sweet       │   │    NewSweet     │   │   SweetPatch    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  name           │   │  name?          │       │
//! │  │  name           │   │  category       │   │  category?      │       │
//! │  │  category       │   │  price          │   │  price?         │       │
//! │  │  price (Money)  │   │  in_stock       │   │  in_stock?      │       │
//! │  │  in_stock       │   └─────────────────┘   └─────────────────┘       │
//! │  │  created_at     │                                                    │
//! │  │  updated_at     │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │  SearchFilter   │   │ SortField/Order │       │
//! │                        │  name? category?│   │ name, category, │       │
//! │                        │  min/max price? │   │ price, in_stock │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Both storage variants (SQLite and in-memory) assign ids from an
//! auto-incrementing integer counter, so a `SweetId` means the same thing
//! on either side of the HTTP boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

/// Identifier of a sweet, assigned by the store at creation.
pub type SweetId = i64;

// =============================================================================
// Sweet
// =============================================================================

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweet {
    /// Unique identifier, immutable after creation.
    pub id: SweetId,

    /// Display name.
    pub name: String,

    /// Free-form category label (e.g. "Chocolate").
    pub category: String,

    /// Unit price. Always > 0 for stored records.
    pub price: Money,

    /// Units on hand. Always >= 0 for stored records.
    pub in_stock: i64,

    /// Set by the store when the record is created.
    pub created_at: DateTime<Utc>,

    /// Set by the store on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Sweet {
    /// Returns the value of the units on hand (`price × in_stock`).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.in_stock)
    }

    /// True when nothing is left to sell.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.in_stock == 0
    }

    /// True when some, but at most `LOW_STOCK_THRESHOLD`, units remain.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.in_stock > 0 && self.in_stock <= LOW_STOCK_THRESHOLD
    }

    /// Returns a copy with the present patch fields applied.
    ///
    /// Does not validate and does not touch timestamps; stores call
    /// [`crate::validation::validate_sweet`] on the result and set
    /// `updated_at` themselves.
    pub fn merged(&self, patch: &SweetPatch) -> Sweet {
        let mut merged = self.clone();
        if let Some(name) = &patch.name {
            merged.name = name.trim().to_string();
        }
        if let Some(category) = &patch.category {
            merged.category = category.trim().to_string();
        }
        if let Some(price) = patch.price {
            merged.price = price;
        }
        if let Some(in_stock) = patch.in_stock {
            merged.in_stock = in_stock;
        }
        merged
    }
}

// =============================================================================
// New Sweet
// =============================================================================

/// A complete, not-yet-stored sweet.
///
/// Build one through [`crate::validation::require_complete`] so that every
/// `NewSweet` reaching a store has passed the required-field checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: Money,
    #[serde(alias = "quantity")]
    pub in_stock: i64,
}

impl NewSweet {
    /// Convenience constructor used by seeds and tests.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money,
        in_stock: i64,
    ) -> Self {
        NewSweet {
            name: name.into(),
            category: category.into(),
            price,
            in_stock,
        }
    }
}

// =============================================================================
// Sweet Patch
// =============================================================================

/// A set of optional field values.
///
/// Serves two purposes:
/// - the raw request body of create / full-replacement update, where
///   missing fields must be reported as "required" rather than as a
///   deserialization failure
/// - a partial update applied with [`Sweet::merged`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweetPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default, alias = "quantity")]
    pub in_stock: Option<i64>,
}

impl SweetPatch {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.in_stock.is_none()
    }
}

impl From<NewSweet> for SweetPatch {
    fn from(sweet: NewSweet) -> Self {
        SweetPatch {
            name: Some(sweet.name),
            category: Some(sweet.category),
            price: Some(sweet.price),
            in_stock: Some(sweet.in_stock),
        }
    }
}

// =============================================================================
// Stock Requests
// =============================================================================

/// Body of a purchase or restock request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

// =============================================================================
// Query Types
// =============================================================================

/// Optional predicates over the collection, ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Case-insensitive substring of the name.
    #[serde(default)]
    pub name: Option<String>,

    /// Exact category label.
    #[serde(default)]
    pub category: Option<String>,

    /// Inclusive lower price bound.
    #[serde(default)]
    pub min_price: Option<Money>,

    /// Inclusive upper price bound.
    #[serde(default)]
    pub max_price: Option<Money>,
}

/// Field a collection can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Category,
    Price,
    InStock,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// A filter plus an optional ordering, as sent in a search query string:
/// `?category=Chocolate&max_price=3.20&sort=price&order=desc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweetQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_price: Option<Money>,
    #[serde(default)]
    pub max_price: Option<Money>,
    #[serde(default)]
    pub sort: Option<SortField>,
    #[serde(default)]
    pub order: Option<SortOrder>,
}

impl SweetQuery {
    /// Extracts the predicate part of the query.
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            name: self.name.clone(),
            category: self.category.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sweet {
        let now = Utc::now();
        Sweet {
            id: 1,
            name: "Gulab Jamun".to_string(),
            category: "Milk-based Sweets".to_string(),
            price: Money::from_cents(1500),
            in_stock: 4,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stock_flags() {
        let mut sweet = sample();
        assert!(sweet.is_low_stock());
        assert!(!sweet.is_out_of_stock());

        sweet.in_stock = 0;
        assert!(sweet.is_out_of_stock());
        assert!(!sweet.is_low_stock());

        sweet.in_stock = LOW_STOCK_THRESHOLD + 1;
        assert!(!sweet.is_low_stock());
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(sample().stock_value().cents(), 6000);
    }

    #[test]
    fn test_merged_applies_only_present_fields() {
        let sweet = sample();
        let patch = SweetPatch {
            price: Some(Money::from_cents(1700)),
            name: Some("  Kala Jamun ".to_string()),
            ..Default::default()
        };

        let merged = sweet.merged(&patch);
        assert_eq!(merged.name, "Kala Jamun");
        assert_eq!(merged.price.cents(), 1700);
        assert_eq!(merged.category, sweet.category);
        assert_eq!(merged.in_stock, sweet.in_stock);
        assert_eq!(merged.id, sweet.id);
    }

    #[test]
    fn test_patch_accepts_quantity_alias() {
        let patch: SweetPatch = serde_json::from_str(r#"{"name":"Ladoo","quantity":12}"#).unwrap();
        assert_eq!(patch.in_stock, Some(12));
        assert!(patch.category.is_none());
        assert!(!patch.is_empty());
        assert!(SweetPatch::default().is_empty());
    }

    #[test]
    fn test_sort_enums_wire_names() {
        let field: SortField = serde_json::from_str("\"in_stock\"").unwrap();
        assert_eq!(field, SortField::InStock);
        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
        assert_eq!(SortOrder::default(), SortOrder::Asc);
        assert_eq!(SortOrder::Asc.reversed(), SortOrder::Desc);
    }

    #[test]
    fn test_sweet_serializes_decimal_price() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["price"], serde_json::json!(15.0));
        assert_eq!(json["in_stock"], serde_json::json!(4));
    }
}
