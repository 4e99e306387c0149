//! # Repository Module
//!
//! Database repository implementations for SweetShop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum handler                                                           │
//! │       │                                                                 │
//! │       │  state.db.sweets().purchase(id, quantity)                       │
//! │       ▼                                                                 │
//! │  SweetRepository                                                        │
//! │  ├── list_all / get_by_id / search / categories / stats                 │
//! │  ├── insert / replace / update / delete / clear                         │
//! │  └── purchase / restock                                                 │
//! │       │                                                                 │
//! │       │  SQL (runtime-checked query_as + FromRow)                       │
//! │       ▼                                                                 │
//! │  SQLite `sweets` table                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain rules (validation, ledger arithmetic, filtering) come from
//! `sweetshop-core`; repositories only move rows.

pub mod sweet;
