//! # sweetshop-core: Inventory Domain Logic for SweetShop
//!
//! This crate holds the rules every SweetShop store obeys: what a valid
//! sweet is, how purchases and restocks change stock, and how the
//! collection is filtered and sorted. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SweetShop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /api/sweets ──► search ──► purchase ──► restock ──► stats    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ sweetshop-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation│  │  ledger   │  │   query   │  │   │
//! │  │   │   Sweet   │  │   rules   │  │ purchase  │  │  filter   │  │   │
//! │  │   │   Money   │  │  checks   │  │  restock  │  │   sort    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   store: InventoryStore, the in-memory variant                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 sweetshop-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repository             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sweet, NewSweet, SweetPatch, query types)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules applied before every mutation
//! - [`ledger`] - Purchase / restock arithmetic
//! - [`query`] - Filter and sort
//! - [`stats`] - Inventory statistics
//! - [`store`] - Owned in-memory store
//!
//! ## Example Usage
//!
//! ```rust
//! use sweetshop_core::{InventoryStore, Money, NewSweet, SearchFilter};
//!
//! let mut store = InventoryStore::new();
//! store.create(NewSweet::new("Dark Chocolate Bar", "chocolate", Money::from_cents(350), 10)).unwrap();
//! store.create(NewSweet::new("Gummy Bears", "candy", Money::from_cents(199), 20)).unwrap();
//!
//! let sweet = store.purchase(1, 3).unwrap();
//! assert_eq!(sweet.in_stock, 7);
//!
//! let chocolate = store.search(&SearchFilter {
//!     name: Some("chocolate".into()),
//!     ..Default::default()
//! });
//! assert_eq!(chocolate.len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod query;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::StockChange;
pub use money::Money;
pub use stats::InventoryStats;
pub use store::InventoryStore;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level at or below which a non-empty item counts as "low stock".
pub const LOW_STOCK_THRESHOLD: i64 = 5;
