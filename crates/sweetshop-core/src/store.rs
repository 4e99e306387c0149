//! # In-Memory Inventory Store
//!
//! An owned, constructor-built collection that applies exactly the same
//! validation, ledger and query rules as the SQLite repository. Used for
//! client-side simulation and for testing the domain rules without I/O.
//!
//! ```text
//! ┌──────────────────────────────┐       ┌──────────────────────────────┐
//! │  InventoryStore (this file)  │       │  SweetRepository (db crate)  │
//! │  Vec<Sweet>, next_id         │       │  sweets table                │
//! └──────────────┬───────────────┘       └──────────────┬───────────────┘
//!                │                                      │
//!                └───────────────┬──────────────────────┘
//!                                ▼
//!              validation  ·  ledger  ·  query  ·  stats
//! ```
//!
//! There is no global instance; whoever needs one owns one.

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::ledger::StockChange;
use crate::money::Money;
use crate::query;
use crate::stats::{self, InventoryStats};
use crate::types::{NewSweet, SearchFilter, SortField, SortOrder, Sweet, SweetId, SweetPatch};
use crate::validation::{validate_new_sweet, validate_patch, validate_sweet};

/// Insertion-ordered collection of sweets.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    sweets: Vec<Sweet>,
    next_id: SweetId,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore {
    /// Creates an empty store. Ids start at 1.
    pub fn new() -> Self {
        InventoryStore {
            sweets: Vec::new(),
            next_id: 1,
        }
    }

    /// Creates a store holding `seed`, validated and inserted in order.
    pub fn with_sweets<I>(seed: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = NewSweet>,
    {
        let mut store = Self::new();
        for sweet in seed {
            store.create(sweet)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.sweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweets.is_empty()
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Validates `new`, assigns the next id and appends the record.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::{InventoryStore, Money, NewSweet};
    ///
    /// let mut store = InventoryStore::new();
    /// let sweet = store
    ///     .create(NewSweet::new("Ladoo", "Dry Sweets", Money::from_cents(1000), 40))
    ///     .unwrap();
    /// assert_eq!(sweet.id, 1);
    /// assert_eq!(store.get_by_id(1).unwrap().name, "Ladoo");
    /// ```
    pub fn create(&mut self, new: NewSweet) -> CoreResult<Sweet> {
        validate_new_sweet(&new)?;

        let now = Utc::now();
        let sweet = Sweet {
            id: self.next_id,
            name: new.name.trim().to_string(),
            category: new.category.trim().to_string(),
            price: new.price,
            in_stock: new.in_stock,
            created_at: now,
            updated_at: now,
        };

        self.next_id += 1;
        self.sweets.push(sweet.clone());
        Ok(sweet)
    }

    pub fn get_by_id(&self, id: SweetId) -> CoreResult<&Sweet> {
        self.find(id).ok_or(CoreError::SweetNotFound(id))
    }

    /// All records in insertion order.
    pub fn get_all(&self) -> &[Sweet] {
        &self.sweets
    }

    /// Merges the present fields of `patch` into record `id`.
    ///
    /// Not-found is reported before validation. On any error the record is
    /// left as it was.
    pub fn update(&mut self, id: SweetId, patch: &SweetPatch) -> CoreResult<Sweet> {
        let index = self.position(id)?;
        validate_patch(patch)?;

        let mut merged = self.sweets[index].merged(patch);
        validate_sweet(&merged)?;
        merged.updated_at = Utc::now();

        self.sweets[index] = merged.clone();
        Ok(merged)
    }

    /// Removes record `id`. Fails with not-found, leaving the collection
    /// untouched, when no such record exists.
    pub fn delete(&mut self, id: SweetId) -> CoreResult<()> {
        let index = self.position(id)?;
        self.sweets.remove(index);
        Ok(())
    }

    // =========================================================================
    // Stock Ledger
    // =========================================================================

    /// Sells `quantity` units of record `id`.
    pub fn purchase(&mut self, id: SweetId, quantity: i64) -> CoreResult<Sweet> {
        self.apply_stock_change(id, StockChange::Purchase(quantity))
    }

    /// Receives `quantity` units of record `id`.
    pub fn restock(&mut self, id: SweetId, quantity: i64) -> CoreResult<Sweet> {
        self.apply_stock_change(id, StockChange::Restock(quantity))
    }

    fn apply_stock_change(&mut self, id: SweetId, change: StockChange) -> CoreResult<Sweet> {
        let index = self.sweets.iter().position(|s| s.id == id);
        let in_stock = change.apply(id, index.map(|i| &self.sweets[i]))?;

        // apply() only succeeds when the record exists
        let index = index.ok_or(CoreError::SweetNotFound(id))?;
        let sweet = &mut self.sweets[index];
        sweet.in_stock = in_stock;
        sweet.updated_at = Utc::now();
        Ok(sweet.clone())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Records matching every present predicate, in insertion order.
    pub fn search(&self, predicates: &SearchFilter) -> Vec<Sweet> {
        query::filter(&self.sweets, predicates)
    }

    /// A sorted copy of the collection.
    pub fn sort(&self, field: SortField, order: SortOrder) -> Vec<Sweet> {
        query::sort(&self.sweets, field, order)
    }

    pub fn categories(&self) -> Vec<String> {
        query::categories(&self.sweets)
    }

    pub fn stats(&self) -> InventoryStats {
        InventoryStats::from_sweets(&self.sweets)
    }

    pub fn total_inventory_value(&self) -> Money {
        stats::total_inventory_value(&self.sweets)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn find(&self, id: SweetId) -> Option<&Sweet> {
        self.sweets.iter().find(|s| s.id == id)
    }

    fn position(&self, id: SweetId) -> CoreResult<usize> {
        self.sweets
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoreError::SweetNotFound(id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
